use crate::cell::MatrixCell;
use crate::key::MatrixKey;
use crate::matrix::Matrix;
use crate::value::CellScalar;

/// Reader over one sheet row, used by value mappings to reach sibling cells.
#[derive(Clone)]
pub struct RowReader<'a> {
    matrix: &'a Matrix,
    row_index: usize,
    /// Key scope for name lookups; cells from a concatenated grid resolve
    /// column names against their own grid's columns.
    scope: Option<MatrixKey>,
}

impl<'a> RowReader<'a> {
    pub(crate) fn scoped(matrix: &'a Matrix, row_index: usize, scope: MatrixKey) -> Self {
        Self {
            matrix,
            row_index,
            scope: Some(scope),
        }
    }

    pub(crate) fn unscoped(matrix: &'a Matrix, row_index: usize) -> Self {
        Self {
            matrix,
            row_index,
            scope: None,
        }
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    /// Key of the row value at this index, if any.
    pub fn key(&self) -> Option<&'a str> {
        self.matrix.row_value_at(self.row_index)?.key()
    }

    /// Dense cells of this row.
    pub fn cells(&self) -> &'a [MatrixCell] {
        self.matrix
            .row_value_at(self.row_index)
            .map(|value| value.cells())
            .unwrap_or(&[])
    }

    /// Cell of the named column in this row.
    pub fn col(&self, name: &str) -> Option<&'a MatrixCell> {
        let column = match &self.scope {
            Some(scope) => self.matrix.column_scoped(name, scope),
            None => self.matrix.column_by_name(name),
        }?;
        let index = column.index?;
        self.cells().iter().find(|cell| cell.col_index() == index)
    }
}

/// Reader over every cell of one column, in row order.
pub struct ColumnReader<'a> {
    cells: Vec<&'a MatrixCell>,
}

impl<'a> ColumnReader<'a> {
    pub(crate) fn for_column(matrix: &'a Matrix, col_index: usize) -> Self {
        let cells = matrix
            .row_values()
            .iter()
            .flat_map(|value| value.cells())
            .filter(|cell| cell.col_index() == col_index)
            .collect();
        Self { cells }
    }

    pub fn cells(&self) -> &[&'a MatrixCell] {
        &self.cells
    }

    pub fn first(&self) -> Option<&'a MatrixCell> {
        self.cells.first().copied()
    }

    pub fn values(&self) -> Vec<&'a CellScalar> {
        self.cells.iter().map(|cell| cell.value()).collect()
    }

    /// Cells whose owning row value carries the given key.
    pub fn cells_of_row_key(&self, key: &str) -> Vec<&'a MatrixCell> {
        self.cells
            .iter()
            .filter(|cell| cell.row_key() == Some(key))
            .copied()
            .collect()
    }

    /// Cells strictly between two sheet row indices, in either order.
    pub fn cells_between(&self, a: usize, b: usize) -> Vec<&'a MatrixCell> {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.cells
            .iter()
            .filter(|cell| cell.row_index() > low && cell.row_index() < high)
            .copied()
            .collect()
    }
}

/// Join cell addresses into formula text, e.g. `"A2+A3+A4"`.
pub fn join_addresses<'a, I>(cells: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a MatrixCell>,
{
    cells
        .into_iter()
        .map(MatrixCell::address)
        .collect::<Vec<_>>()
        .join(separator)
}
