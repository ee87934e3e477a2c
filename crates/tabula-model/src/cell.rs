use crate::address::cell_address;
use crate::key::MatrixKey;
use crate::value::CellScalar;

/// The resolved intersection of one row value and one column.
///
/// Cells are immutable once built. The owning row is referenced by key and
/// index, not by pointer, so cells can be cloned and moved across
/// concatenation boundaries without ownership cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixCell {
    matrix_key: MatrixKey,
    row_key: Option<String>,
    row_index: usize,
    col_index: usize,
    col_name: Option<String>,
    value: CellScalar,
    address: String,
}

impl MatrixCell {
    pub(crate) fn new(
        matrix_key: MatrixKey,
        row_key: Option<String>,
        row_index: usize,
        col_index: usize,
        col_name: Option<String>,
        value: CellScalar,
    ) -> Self {
        let address = cell_address(row_index, col_index);
        Self {
            matrix_key,
            row_key,
            row_index,
            col_index,
            col_name,
            value,
            address,
        }
    }

    /// Key of the grid this cell was built for. Cells carried over from the
    /// right operand of a concatenation keep their original scope.
    pub fn matrix_key(&self) -> &MatrixKey {
        &self.matrix_key
    }

    /// Key of the owning row value, when that row has one.
    pub fn row_key(&self) -> Option<&str> {
        self.row_key.as_deref()
    }

    /// 0-indexed sheet row (row 0 is the header row when headers are on).
    pub fn row_index(&self) -> usize {
        self.row_index
    }

    /// 0-indexed column.
    pub fn col_index(&self) -> usize {
        self.col_index
    }

    pub fn col_name(&self) -> Option<&str> {
        self.col_name.as_deref()
    }

    pub fn value(&self) -> &CellScalar {
        &self.value
    }

    /// Spreadsheet A1 address, derived from the indices at construction.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Rebuild this cell at a new position, recomputing its address.
    pub(crate) fn reindexed(&self, row_index: usize, col_index: usize) -> Self {
        Self::new(
            self.matrix_key.clone(),
            self.row_key.clone(),
            row_index,
            col_index,
            self.col_name.clone(),
            self.value.clone(),
        )
    }
}
