use std::io::Write;

use tabula_model::{Matrix, ResolvedCell};

use crate::{MatrixRenderer, RenderError};

/// Writes a grid as CSV.
///
/// CSV has no styling surface, so formats are not applied. Formula cells are
/// written as their raw mapped text, leading `=` included, which spreadsheet
/// applications re-interpret on import.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvRenderer;

impl CsvRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MatrixRenderer for CsvRenderer {
    fn generate(&self, matrix: &Matrix, out: &mut dyn Write) -> Result<(), RenderError> {
        let mut writer = csv::Writer::from_writer(out);
        let width = matrix.count_of_columns();

        if matrix.has_headers() {
            let mut headers = vec![String::new(); width];
            for column in matrix.columns_definitions() {
                if let Some(index) = column.index.filter(|&index| index < width) {
                    headers[index] = column.display_label().to_string();
                }
            }
            writer.write_record(&headers)?;
        }

        for value in matrix.row_values() {
            let mut record = vec![String::new(); width];
            for cell in value.cells() {
                let text = match matrix.resolve(cell) {
                    ResolvedCell::Absent => continue,
                    ResolvedCell::Literal(scalar) => scalar.to_string(),
                    ResolvedCell::Formula(formula) => formula.raw().to_string(),
                };
                if cell.col_index() < width {
                    record[cell.col_index()] = text;
                }
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
