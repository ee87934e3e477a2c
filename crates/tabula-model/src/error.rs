use thiserror::Error;

use crate::concat::ConcatStrategy;
use crate::key::MatrixKey;

/// Errors raised while building or combining grids.
///
/// Every failure is synchronous and local to the call that triggered it; the
/// engine yields either a fully valid grid or no result at all.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum MatrixError {
    #[error("count of rows must be greater than zero (got {0})")]
    InvalidRowCount(usize),

    #[error("count of columns must be greater than zero (got {0})")]
    InvalidColumnCount(usize),

    #[error("column at position {0} has no name")]
    UnnamedColumn(usize),

    #[error("no column named {0:?} is declared")]
    UnknownColumn(String),

    #[error("cannot concatenate matrices sharing the key {0}")]
    SameKeyConcat(MatrixKey),

    #[error("row definitions on both sides share the key {0:?}")]
    RowKeyCollision(String),

    #[error("concat strategy {0:?} is not implemented")]
    UnimplementedStrategy(ConcatStrategy),
}

pub type Result<T> = std::result::Result<T, MatrixError>;
