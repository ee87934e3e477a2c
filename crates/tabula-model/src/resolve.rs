use crate::cell::MatrixCell;
use crate::matrix::Matrix;
use crate::value::CellScalar;

/// Sentinel marking a mapped string value as formula text.
pub const FORMULA_SENTINEL: char = '=';

/// Formula text produced by a value mapping.
///
/// Writers disagree on whether formula text carries the leading `=` sign, so
/// both views are exposed and the choice stays with the writer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormulaText {
    raw: String,
}

impl FormulaText {
    pub(crate) fn new(raw: String) -> Self {
        debug_assert!(raw.starts_with(FORMULA_SENTINEL));
        Self { raw }
    }

    /// The mapped string as returned, leading `=` included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Formula body with the leading `=` stripped.
    pub fn body(&self) -> &str {
        self.raw.strip_prefix(FORMULA_SENTINEL).unwrap_or(&self.raw)
    }
}

/// A cell's effective content at render time.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedCell {
    /// Neither a literal value nor a mapping exists; writers skip the cell.
    Absent,
    /// A literal value, to be written through the native API matching the
    /// column's declared data type.
    Literal(CellScalar),
    /// Formula text; never evaluated here.
    Formula(FormulaText),
}

impl ResolvedCell {
    pub fn is_formula(&self) -> bool {
        matches!(self, ResolvedCell::Formula(_))
    }

    fn from_scalar(value: CellScalar) -> Self {
        match value {
            CellScalar::Empty => ResolvedCell::Absent,
            CellScalar::Text(text) if text.starts_with(FORMULA_SENTINEL) => {
                ResolvedCell::Formula(FormulaText::new(text))
            }
            other => ResolvedCell::Literal(other),
        }
    }
}

impl Matrix {
    /// Resolve a cell's effective value.
    ///
    /// If the owning row's definition maps the cell's column, the mapping is
    /// invoked with `(matrix, cell)`; a returned string starting with `=`
    /// becomes formula text. Without a mapping the cell's literal value is
    /// used. Mappings run once per render pass, not at build time.
    pub fn resolve(&self, cell: &MatrixCell) -> ResolvedCell {
        let definition = self.row_definition(cell.row_key());
        let mapped = cell
            .col_name()
            .and_then(|name| definition.mapping_for(name))
            .map(|mapping| mapping.as_ref()(self, cell));

        match mapped {
            Some(value) => ResolvedCell::from_scalar(value),
            None => match cell.value() {
                CellScalar::Empty => ResolvedCell::Absent,
                literal => ResolvedCell::Literal(literal.clone()),
            },
        }
    }
}
