use std::any::Any;
use std::io::Write;

use tabula_model::{column_letters, BasicFormat, FontStyle, Format, Matrix, ResolvedCell};

use crate::{FormatApplier, MatrixRenderer, RenderError};

/// Text emphasis available in a Markdown table cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Bold,
    Italic,
    Strikethrough,
}

/// Markdown-native format kind: a prebuilt emphasis style.
///
/// Like other native kinds it merges whole-object, most specific cascade
/// layer wins.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MarkdownFormat {
    pub emphasis: Emphasis,
}

impl MarkdownFormat {
    pub const KIND: &'static str = "markdown";

    pub fn new(emphasis: Emphasis) -> Self {
        Self { emphasis }
    }
}

impl Format for MarkdownFormat {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A Markdown table cell under construction.
#[derive(Clone, Debug, Default)]
pub struct MdCell {
    pub text: String,
    pub emphasis: Option<Emphasis>,
}

impl MdCell {
    fn render(&self) -> String {
        let escaped = escape_pipes(&self.text);
        if escaped.is_empty() {
            return escaped;
        }
        match self.emphasis {
            Some(Emphasis::Bold) => format!("**{escaped}**"),
            Some(Emphasis::Italic) => format!("*{escaped}*"),
            Some(Emphasis::Strikethrough) => format!("~~{escaped}~~"),
            None => escaped,
        }
    }
}

/// Applier for the Markdown-native format kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownFormatApplier;

impl FormatApplier for MarkdownFormatApplier {
    type Format = MarkdownFormat;
    type Cell = MdCell;

    const KIND: &'static str = MarkdownFormat::KIND;

    fn apply_format(&self, cell: &mut Self::Cell, format: &Self::Format) {
        cell.emphasis = Some(format.emphasis);
    }
}

/// Applier mapping the portable [`BasicFormat`] kind onto Markdown emphasis.
///
/// Font size and background color have no Markdown counterpart and are
/// dropped at application time; they still participate in the attribute
/// merge, so a layer that only overrides the color does not clobber a font
/// style set below it.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicEmphasisApplier;

impl FormatApplier for BasicEmphasisApplier {
    type Format = BasicFormat;
    type Cell = MdCell;

    const KIND: &'static str = BasicFormat::KIND;

    fn merge(&self, formats: Vec<&Self::Format>) -> Option<Self::Format> {
        BasicFormat::merged(formats)
    }

    fn apply_format(&self, cell: &mut Self::Cell, format: &Self::Format) {
        cell.emphasis = match format.font_style {
            Some(FontStyle::Bold) => Some(Emphasis::Bold),
            Some(FontStyle::Italic) => Some(Emphasis::Italic),
            Some(FontStyle::Strikeout) => Some(Emphasis::Strikethrough),
            None => cell.emphasis,
        };
    }
}

/// Writes a grid as a Markdown pipe table.
///
/// The table's header row shows declared column labels when the grid carries
/// headers, and plain column letters otherwise (pipe tables always need a
/// header line). Formula cells are written with the `=` stripped.
pub struct MarkdownRenderer<A> {
    applier: A,
}

impl MarkdownRenderer<BasicEmphasisApplier> {
    /// Renderer applying portable formats.
    pub fn basic() -> Self {
        Self::new(BasicEmphasisApplier)
    }
}

impl MarkdownRenderer<MarkdownFormatApplier> {
    /// Renderer applying Markdown-native formats.
    pub fn native() -> Self {
        Self::new(MarkdownFormatApplier)
    }
}

impl<A> MarkdownRenderer<A>
where
    A: FormatApplier<Cell = MdCell>,
{
    pub fn new(applier: A) -> Self {
        Self { applier }
    }

    fn header_cells(&self, matrix: &Matrix) -> Result<Vec<String>, RenderError> {
        let width = matrix.count_of_columns();
        let mut cells = vec![String::new(); width];

        if matrix.has_headers() {
            for column in matrix.columns_definitions() {
                let Some(index) = column.index.filter(|&index| index < width) else {
                    continue;
                };
                let mut cell = MdCell {
                    text: column.display_label().to_string(),
                    emphasis: None,
                };
                if let Some(format) = &column.header_format {
                    self.applier.apply_direct(&mut cell, format.as_ref())?;
                }
                cells[index] = cell.render();
            }
        } else {
            for (index, cell) in cells.iter_mut().enumerate() {
                *cell = column_letters(index);
            }
        }
        Ok(cells)
    }
}

impl<A> MatrixRenderer for MarkdownRenderer<A>
where
    A: FormatApplier<Cell = MdCell>,
{
    fn generate(&self, matrix: &Matrix, out: &mut dyn Write) -> Result<(), RenderError> {
        let width = matrix.count_of_columns();

        write_row(out, &self.header_cells(matrix)?)?;
        let separator = vec!["---".to_string(); width];
        write_row(out, &separator)?;

        let default_row = matrix.default_row_definition();
        for value in matrix.row_values() {
            let current_row = matrix.row_definition(value.key());
            let mut rendered = vec![String::new(); width];
            for cell in value.cells() {
                if cell.col_index() >= width {
                    continue;
                }
                let text = match matrix.resolve(cell) {
                    ResolvedCell::Absent => String::new(),
                    ResolvedCell::Literal(scalar) => scalar.to_string(),
                    ResolvedCell::Formula(formula) => formula.body().to_string(),
                };
                let mut md_cell = MdCell {
                    text,
                    emphasis: None,
                };
                self.applier
                    .apply_cascade(&default_row, &current_row, cell.col_index(), &mut md_cell);
                rendered[cell.col_index()] = md_cell.render();
            }
            write_row(out, &rendered)?;
        }
        Ok(())
    }
}

fn write_row(out: &mut dyn Write, cells: &[String]) -> std::io::Result<()> {
    write!(out, "|")?;
    for cell in cells {
        write!(out, " {cell} |")?;
    }
    writeln!(out)
}

fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}
