use core::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a grid instance.
///
/// Two grids with equal keys must never be concatenated: column and row
/// identity is scoped by the grid key, so joining a grid with itself would
/// produce ambiguous addressing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatrixKey {
    pub name: String,
    pub index: u32,
}

impl MatrixKey {
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

impl fmt::Display for MatrixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.index)
    }
}

/// Identity of a column, unique across concatenation boundaries.
///
/// Plain column names stop being unique once two grids are joined, so the key
/// carries the owning grid's [`MatrixKey`] alongside the column index and
/// name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    pub matrix_key: MatrixKey,
    pub index: usize,
    pub name: String,
}

impl ColumnKey {
    pub fn new(matrix_key: MatrixKey, index: usize, name: impl Into<String>) -> Self {
        Self {
            matrix_key,
            index,
            name: name.into(),
        }
    }
}
