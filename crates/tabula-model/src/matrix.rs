use std::borrow::Cow;
use std::collections::HashMap;

use crate::builder::MatrixBuilder;
use crate::cell::MatrixCell;
use crate::column::ColumnDefinition;
use crate::key::MatrixKey;
use crate::reader::{ColumnReader, RowReader};
use crate::row::{RowDefinition, RowValue};

/// The core tabular entity: dimensions, columns, rows, and values.
///
/// A matrix is produced by [`MatrixBuilder`] and is effectively immutable
/// afterwards; the only mutation path is the index-shifting performed by
/// horizontal concatenation, which consumes both operands.
#[derive(Clone, Debug)]
pub struct Matrix {
    key: MatrixKey,
    count_of_rows: usize,
    count_of_columns: usize,
    with_headers_row: bool,
    columns: Vec<ColumnDefinition>,
    rows_definitions: Vec<RowDefinition>,
    rows_by_key: HashMap<String, usize>,
    row_values: Vec<RowValue>,
}

impl Matrix {
    /// Start declaring a new grid.
    pub fn with() -> MatrixBuilder {
        MatrixBuilder::new()
    }

    pub(crate) fn from_parts(
        key: MatrixKey,
        count_of_rows: usize,
        count_of_columns: usize,
        with_headers_row: bool,
        columns: Vec<ColumnDefinition>,
        rows_definitions: Vec<RowDefinition>,
        row_values: Vec<RowValue>,
    ) -> Self {
        let mut rows_by_key = HashMap::new();
        for (position, def) in rows_definitions.iter().enumerate() {
            // First definition wins; duplicates keep the lookup deterministic.
            rows_by_key.entry(def.key().to_string()).or_insert(position);
        }
        Self {
            key,
            count_of_rows,
            count_of_columns,
            with_headers_row,
            columns,
            rows_definitions,
            rows_by_key,
            row_values,
        }
    }

    pub fn key(&self) -> &MatrixKey {
        &self.key
    }

    /// Declared row capacity; may exceed the number of row values.
    pub fn count_of_rows(&self) -> usize {
        self.count_of_rows
    }

    /// Declared column capacity; may exceed the number of declared columns.
    pub fn count_of_columns(&self) -> usize {
        self.count_of_columns
    }

    pub fn with_headers_row(&self) -> bool {
        self.with_headers_row
    }

    /// A header row is emitted only when headers are enabled and at least one
    /// column is declared.
    pub fn has_headers(&self) -> bool {
        self.with_headers_row && !self.columns.is_empty()
    }

    /// Sheet row index of the first data row (1 when a header row is
    /// present, 0 otherwise).
    pub fn header_offset(&self) -> usize {
        usize::from(self.has_headers())
    }

    pub fn columns_definitions(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn rows_definitions(&self) -> &[RowDefinition] {
        &self.rows_definitions
    }

    pub fn row_values(&self) -> &[RowValue] {
        &self.row_values
    }

    /// Look up one of this grid's own columns by its assigned index.
    pub fn column_by_index(&self, index: usize) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|col| col.index == Some(index))
    }

    /// Look up a column by name. After a concatenation names may repeat; the
    /// first (leftmost) match wins.
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Look up a column by name within one grid's key scope. Used by the
    /// readers so that a cell carried over from a concatenated grid resolves
    /// names against its own columns.
    pub(crate) fn column_scoped(&self, name: &str, scope: &MatrixKey) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|col| {
            col.name == name
                && col
                    .key
                    .as_ref()
                    .map_or(true, |key| &key.matrix_key == scope)
        })
    }

    /// Resolve a row definition by key.
    ///
    /// Never fails: `None` and unmatched keys both fall back to the
    /// [`RowDefinition::DEFAULT_KEY`] definition, synthesizing an empty one
    /// if the grid does not declare it.
    pub fn row_definition(&self, key: Option<&str>) -> Cow<'_, RowDefinition> {
        let key = key.unwrap_or(RowDefinition::DEFAULT_KEY);
        match self.rows_by_key.get(key) {
            Some(&position) => Cow::Borrowed(&self.rows_definitions[position]),
            None => Cow::Owned(RowDefinition::default()),
        }
    }

    /// The definition applying to rows without a specific match.
    pub fn default_row_definition(&self) -> Cow<'_, RowDefinition> {
        self.row_definition(None)
    }

    /// Row value sitting at the given sheet row index, if any.
    pub fn row_value_at(&self, row_index: usize) -> Option<&RowValue> {
        let position = row_index.checked_sub(self.header_offset())?;
        self.row_values.get(position)
    }

    /// The row value owning the given cell.
    pub fn row_of(&self, cell: &MatrixCell) -> Option<&RowValue> {
        self.row_value_at(cell.row_index())
    }

    /// Reader over the row owning `cell`.
    pub fn row(&self, cell: &MatrixCell) -> RowReader<'_> {
        RowReader::scoped(self, cell.row_index(), cell.matrix_key().clone())
    }

    /// Reader over the row immediately above `cell`, or `None` on the first
    /// sheet row.
    pub fn row_above(&self, cell: &MatrixCell) -> Option<RowReader<'_>> {
        let row_index = cell.row_index().checked_sub(1)?;
        Some(RowReader::scoped(self, row_index, cell.matrix_key().clone()))
    }

    /// Reader over an explicit sheet row index.
    pub fn row_at(&self, row_index: usize) -> RowReader<'_> {
        RowReader::unscoped(self, row_index)
    }

    /// Reader over every cell in `cell`'s column, across all row values.
    pub fn col(&self, cell: &MatrixCell) -> ColumnReader<'_> {
        ColumnReader::for_column(self, cell.col_index())
    }

    /// Sheet row index of the closest preceding row value carrying `key`.
    /// Supports running totals that close over the previous section.
    pub fn row_index_of_previous(&self, key: &str, cell: &MatrixCell) -> Option<usize> {
        let position = cell.row_index().checked_sub(self.header_offset())?;
        self.row_values[..position.min(self.row_values.len())]
            .iter()
            .rposition(|value| value.key() == Some(key))
            .map(|found| found + self.header_offset())
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        MatrixKey,
        usize,
        usize,
        bool,
        Vec<ColumnDefinition>,
        Vec<RowDefinition>,
        Vec<RowValue>,
    ) {
        (
            self.key,
            self.count_of_rows,
            self.count_of_columns,
            self.with_headers_row,
            self.columns,
            self.rows_definitions,
            self.row_values,
        )
    }
}
