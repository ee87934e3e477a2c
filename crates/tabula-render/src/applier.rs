use tabula_model::{formats_in_cascade_order, Format, FormatError, RowDefinition};

/// Applies resolved formats of one concrete kind to a renderer-native cell.
///
/// The provided methods implement the shared cascade-and-merge behavior:
/// collect the four cascade layers (default-row default, default-row
/// per-column, current-row default, current-row per-column), merge them, and
/// apply the winner. The default merge takes the most specific layer whole;
/// kinds that merge per attribute override [`FormatApplier::merge`].
pub trait FormatApplier {
    /// The format kind this applier handles.
    type Format: Format + Clone;

    /// The renderer-native cell or style object mutated by application.
    type Cell;

    /// Kind tag reported in mismatch errors.
    const KIND: &'static str;

    /// Apply one format of the handled kind.
    fn apply_format(&self, cell: &mut Self::Cell, format: &Self::Format);

    /// Merge the cascade, least specific first. Defaults to last-wins.
    fn merge(&self, formats: Vec<&Self::Format>) -> Option<Self::Format> {
        formats.last().map(|&format| format.clone())
    }

    /// Run the cascade for one cell and apply the merged result. Formats of
    /// other kinds in the cascade are skipped; an empty cascade is a no-op.
    fn apply_cascade(
        &self,
        default_row: &RowDefinition,
        current_row: &RowDefinition,
        col_index: usize,
        cell: &mut Self::Cell,
    ) {
        let ordered = formats_in_cascade_order::<Self::Format>(default_row, current_row, col_index);
        if let Some(merged) = self.merge(ordered) {
            self.apply_format(cell, &merged);
        }
    }

    /// Apply a format directly, failing loudly when its kind does not match.
    fn apply_direct(&self, cell: &mut Self::Cell, format: &dyn Format) -> Result<(), FormatError> {
        match format.as_any().downcast_ref::<Self::Format>() {
            Some(concrete) => {
                self.apply_format(cell, concrete);
                Ok(())
            }
            None => Err(FormatError::KindMismatch {
                expected: Self::KIND,
                actual: format.kind(),
            }),
        }
    }
}
