use crate::cell::MatrixCell;
use crate::error::{MatrixError, Result};
use crate::key::ColumnKey;
use crate::matrix::Matrix;
use crate::row::RowDefinition;

/// Policy for reconciling row definitions whose keys exist on both sides of
/// a horizontal concatenation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ConcatStrategy {
    /// Colliding keys keep the left definition; right-hand per-column formats
    /// for newly introduced columns are folded in.
    #[default]
    KeepLeft,
    /// Not implemented; selecting it fails rather than guessing a policy.
    KeepRight,
    /// Not implemented; selecting it fails rather than guessing a policy.
    Merge,
    /// Any key present on both sides aborts the concatenation.
    RaiseError,
}

impl Matrix {
    /// Merge two grids side by side.
    ///
    /// Both operands are consumed: the algorithm re-addresses the right
    /// grid's index maps and cells in place, so neither input remains usable
    /// as an independent grid. The result keeps the left grid's key and
    /// header flag; right-hand columns keep their original key scope with
    /// shifted indices.
    pub fn concat_x(self, right: Matrix, strategy: ConcatStrategy) -> Result<Matrix> {
        if self.key() == right.key() {
            return Err(MatrixError::SameKeyConcat(self.key().clone()));
        }

        let (left_key, left_rows_count, left_cols_count, with_headers, mut columns, left_defs, mut values) =
            self.into_parts();
        let (right_key, right_rows_count, right_cols_count, _, right_columns, right_defs, right_values) =
            right.into_parts();

        for mut column in right_columns {
            if let Some(index) = column.index {
                let shifted = index + left_cols_count;
                column.index = Some(shifted);
                column.key = Some(ColumnKey::new(right_key.clone(), shifted, column.name.clone()));
            }
            columns.push(column);
        }

        let definitions =
            concat_row_definitions(left_defs, right_defs, strategy, left_cols_count)?;

        let has_headers = with_headers && !columns.is_empty();
        let offset = usize::from(has_headers);

        // Row values join positionally, not by key.
        let left_len = values.len();
        let mut right_values = right_values.into_iter();
        for (position, left_value) in values.iter_mut().enumerate() {
            let Some(right_value) = right_values.next() else {
                break;
            };
            let row_index = left_value
                .cells()
                .first()
                .map(MatrixCell::row_index)
                .unwrap_or(position + offset);
            left_value.merge_shifted_values(&right_value, left_cols_count);
            let carried: Vec<MatrixCell> = right_value
                .cells()
                .iter()
                .map(|cell| cell.reindexed(row_index, cell.col_index() + left_cols_count))
                .collect();
            left_value.cells_mut().extend(carried);
        }

        // Surplus right-hand rows are appended, shifted like the rest.
        for (extra, mut right_value) in right_values.enumerate() {
            let row_index = left_len + extra + offset;
            right_value.shift_value_indices(left_cols_count);
            let carried: Vec<MatrixCell> = right_value
                .cells()
                .iter()
                .map(|cell| cell.reindexed(row_index, cell.col_index() + left_cols_count))
                .collect();
            *right_value.cells_mut() = carried;
            values.push(right_value);
        }

        let mut builder = Matrix::with().matrix_key(left_key).dimensions(
            left_rows_count.max(right_rows_count),
            left_cols_count + right_cols_count,
        );
        if !with_headers {
            builder = builder.without_headers_row();
        }
        builder
            .cols(columns)
            .rows(definitions)
            .row_values(values)
            .build()
    }

    /// Stack two grids vertically.
    ///
    /// Unfinished: the result carries the combined dimensions (rows summed,
    /// columns maxed) but no content; definitions and values are not merged.
    pub fn concat_y(self, right: Matrix) -> Result<Matrix> {
        if self.key() == right.key() {
            return Err(MatrixError::SameKeyConcat(self.key().clone()));
        }
        Matrix::with()
            .matrix_key(self.key().clone())
            .dimensions(
                self.count_of_rows() + right.count_of_rows(),
                self.count_of_columns().max(right.count_of_columns()),
            )
            .build()
    }
}

fn concat_row_definitions(
    mut left: Vec<RowDefinition>,
    right: Vec<RowDefinition>,
    strategy: ConcatStrategy,
    left_cols_count: usize,
) -> Result<Vec<RowDefinition>> {
    match strategy {
        ConcatStrategy::RaiseError => {
            if let Some(colliding) = right
                .iter()
                .find(|r| left.iter().any(|l| l.key() == r.key()))
            {
                return Err(MatrixError::RowKeyCollision(colliding.key().to_string()));
            }
        }
        ConcatStrategy::KeepRight | ConcatStrategy::Merge => {
            return Err(MatrixError::UnimplementedStrategy(strategy));
        }
        ConcatStrategy::KeepLeft => {}
    }

    for mut right_def in right {
        right_def.shift_format_indices(left_cols_count);
        match left.iter_mut().find(|l| l.key() == right_def.key()) {
            // A colliding key keeps the left definition but picks up the
            // right one's formats for the newly introduced columns.
            Some(left_def) => left_def.fold_formats_from(&right_def, left_cols_count),
            None => left.push(right_def),
        }
    }
    Ok(left)
}
