use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::cell::MatrixCell;
use crate::column::ColumnDefinition;
use crate::error::{MatrixError, Result};
use crate::format::Format;
use crate::key::{ColumnKey, MatrixKey};
use crate::matrix::Matrix;
use crate::row::{RowDefinition, RowValue};
use crate::value::CellScalar;

/// Accumulated declarations shared by every builder phase.
struct Draft {
    key: MatrixKey,
    count_of_rows: usize,
    count_of_cols: usize,
    with_headers_row: bool,
    columns: Vec<ColumnDefinition>,
    rows: Vec<RowDefinition>,
    values: Vec<RowValue>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            key: MatrixKey::default(),
            count_of_rows: 0,
            count_of_cols: 0,
            with_headers_row: true,
            columns: Vec::new(),
            rows: Vec::new(),
            values: Vec::new(),
        }
    }
}

/// Entry phase of the fluent grid declaration.
///
/// Phases are separate types so that per-column formats and value mappings
/// can only be attached while a row is current: `MatrixBuilder` →
/// [`ColumnsBuilder`] → [`RowsBuilder`] → [`RowBuilder`]. Every phase can
/// finish with [`MatrixBuilder::row_values`]-equivalents and `build()`.
/// Builders are single-use: one builder produces one grid.
#[derive(Default)]
pub struct MatrixBuilder {
    draft: Draft,
}

impl MatrixBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Identity of the grid under construction.
    pub fn key(mut self, name: impl Into<String>, index: u32) -> Self {
        self.draft.key = MatrixKey::new(name, index);
        self
    }

    pub fn matrix_key(mut self, key: MatrixKey) -> Self {
        self.draft.key = key;
        self
    }

    /// Explicit capacity; either count may exceed the declared content.
    pub fn dimensions(mut self, rows_count: usize, cols_count: usize) -> Self {
        self.draft.count_of_rows = rows_count;
        self.draft.count_of_cols = cols_count;
        self
    }

    pub fn rows_count(mut self, rows_count: usize) -> Self {
        self.draft.count_of_rows = rows_count;
        self
    }

    pub fn cols_count(mut self, cols_count: usize) -> Self {
        self.draft.count_of_cols = cols_count;
        self
    }

    /// Suppress the header row; data rows then start at sheet row 0.
    pub fn without_headers_row(mut self) -> Self {
        self.draft.with_headers_row = false;
        self
    }

    /// Declare columns in bulk.
    pub fn cols(mut self, cols: Vec<ColumnDefinition>) -> Self {
        self.draft.columns = cols;
        self
    }

    /// Declare row definitions in bulk.
    pub fn rows(mut self, rows: Vec<RowDefinition>) -> Self {
        self.draft.rows = rows;
        self
    }

    /// Enter the column-declaration phase.
    pub fn columns(self) -> ColumnsBuilder {
        ColumnsBuilder { draft: self.draft }
    }

    /// Enter the row-declaration phase.
    pub fn row_definitions(self) -> RowsBuilder {
        RowsBuilder { draft: self.draft }
    }

    /// Attach the literal row data.
    pub fn row_values(mut self, values: Vec<RowValue>) -> Self {
        self.draft.values = values;
        self
    }

    pub fn build(self) -> Result<Matrix> {
        self.draft.build()
    }
}

/// Column-declaration phase.
pub struct ColumnsBuilder {
    draft: Draft,
}

impl ColumnsBuilder {
    /// Declare the next column. Index is assigned from declaration order at
    /// build time unless the definition carries one.
    pub fn col(mut self, column: impl Into<ColumnDefinition>) -> Self {
        self.draft.columns.push(column.into());
        self
    }

    /// Enter the row-declaration phase.
    pub fn rows(self) -> RowsBuilder {
        RowsBuilder { draft: self.draft }
    }

    pub fn row_values(self, values: Vec<RowValue>) -> MatrixBuilder {
        MatrixBuilder { draft: self.draft }.row_values(values)
    }

    pub fn build(self) -> Result<Matrix> {
        self.draft.build()
    }
}

/// Row-declaration phase; no row is current yet.
pub struct RowsBuilder {
    draft: Draft,
}

impl RowsBuilder {
    /// Start the default row definition (applies when no keyed row matches).
    pub fn row(self) -> RowBuilder {
        self.push(RowDefinition::default())
    }

    /// Start a keyed row definition.
    pub fn keyed_row(self, key: impl Into<String>) -> RowBuilder {
        self.push(RowDefinition::new(key))
    }

    fn push(mut self, definition: RowDefinition) -> RowBuilder {
        self.draft.rows.push(definition);
        RowBuilder { draft: self.draft }
    }

    pub fn row_values(self, values: Vec<RowValue>) -> MatrixBuilder {
        MatrixBuilder { draft: self.draft }.row_values(values)
    }

    pub fn build(self) -> Result<Matrix> {
        self.draft.build()
    }
}

/// Row-declaration phase with a current row; formats and value mappings
/// attach to the most recently declared row.
pub struct RowBuilder {
    draft: Draft,
}

impl RowBuilder {
    fn current(&mut self) -> &mut RowDefinition {
        self.draft
            .rows
            .last_mut()
            .expect("RowBuilder always has a current row")
    }

    /// Default cell format for the current row.
    pub fn default_format(mut self, format: impl Format) -> Self {
        self.current().set_default_format_shared(Arc::new(format));
        self
    }

    /// Per-column format for the current row.
    pub fn format(mut self, col_name: impl Into<String>, format: impl Format) -> Self {
        self.current().insert_format(col_name.into(), Arc::new(format));
        self
    }

    /// Per-column derived-value mapping for the current row.
    pub fn value_map<F>(mut self, col_name: impl Into<String>, mapping: F) -> Self
    where
        F: Fn(&Matrix, &MatrixCell) -> CellScalar + Send + Sync + 'static,
    {
        self.current().insert_mapping(col_name.into(), Arc::new(mapping));
        self
    }

    /// Start the next row definition.
    pub fn row(mut self) -> Self {
        self.draft.rows.push(RowDefinition::default());
        self
    }

    pub fn keyed_row(mut self, key: impl Into<String>) -> Self {
        self.draft.rows.push(RowDefinition::new(key));
        self
    }

    pub fn row_values(self, values: Vec<RowValue>) -> MatrixBuilder {
        MatrixBuilder { draft: self.draft }.row_values(values)
    }

    pub fn build(self) -> Result<Matrix> {
        self.draft.build()
    }
}

impl Draft {
    /// Assemble and validate the grid:
    ///
    /// 1. infer the column count from the explicit count, the declared
    ///    columns, and the widest row value;
    /// 2. infer the row count from the explicit count and the row values;
    /// 3. synthesize columns from value keys when none are declared;
    /// 4. assign missing column indices from declaration order and stamp
    ///    column keys;
    /// 5. densify every row value into per-index values and one cell per
    ///    column, offsetting row indices when a header row is present;
    /// 6. validate dimensions and column names.
    ///
    /// Values that arrive already densified (the concatenation path) keep
    /// their maps and cells; only missing cells are filled in.
    fn build(mut self) -> Result<Matrix> {
        let widest_value = self
            .values
            .iter()
            .map(|value| {
                value
                    .values_by_col_name()
                    .len()
                    .max(value.values_by_col_index().len())
            })
            .max()
            .unwrap_or(0);
        let mut count_of_cols = self
            .count_of_cols
            .max(self.columns.len())
            .max(widest_value);
        let count_of_rows = self.count_of_rows.max(self.values.len());

        if self.columns.is_empty() && !self.values.is_empty() {
            let names: BTreeSet<String> = self
                .values
                .iter()
                .flat_map(|value| value.values_by_col_name().keys().cloned())
                .collect();
            self.columns = names.into_iter().map(ColumnDefinition::new).collect();
            count_of_cols = count_of_cols.max(self.columns.len());
        }

        if count_of_rows == 0 {
            return Err(MatrixError::InvalidRowCount(count_of_rows));
        }
        if count_of_cols == 0 {
            return Err(MatrixError::InvalidColumnCount(count_of_cols));
        }

        for (position, column) in self.columns.iter_mut().enumerate() {
            if column.name.is_empty() {
                return Err(MatrixError::UnnamedColumn(position));
            }
            let index = *column.index.get_or_insert(position);
            if column.key.is_none() {
                column.key = Some(ColumnKey::new(self.key.clone(), index, column.name.clone()));
            }
        }

        // Name lookups resolve to the leftmost column once grids have been
        // concatenated, so first occurrence wins.
        let mut index_by_name: HashMap<&str, usize> = HashMap::new();
        for column in &self.columns {
            if let Some(index) = column.index {
                index_by_name.entry(column.name.as_str()).or_insert(index);
            }
        }

        for definition in &mut self.rows {
            if !definition.formats_by_col_index().is_empty()
                || definition.formats_by_col_name().is_empty()
            {
                continue;
            }
            let mut map = BTreeMap::new();
            for (name, format) in definition.formats_by_col_name() {
                let index = *index_by_name
                    .get(name.as_str())
                    .ok_or_else(|| MatrixError::UnknownColumn(name.clone()))?;
                map.insert(index, Arc::clone(format));
            }
            definition.set_format_index_map(map);
        }

        let has_headers = self.with_headers_row && !self.columns.is_empty();
        let offset = usize::from(has_headers);
        let name_by_index: HashMap<usize, &str> = self
            .columns
            .iter()
            .filter_map(|column| Some((column.index?, column.name.as_str())))
            .collect();

        for (position, value) in self.values.iter_mut().enumerate() {
            if value.values_by_col_index().is_empty() && !value.values_by_col_name().is_empty() {
                let mut map = BTreeMap::new();
                for (name, scalar) in value.values_by_col_name() {
                    let index = *index_by_name
                        .get(name.as_str())
                        .ok_or_else(|| MatrixError::UnknownColumn(name.clone()))?;
                    map.insert(index, scalar.clone());
                }
                value.set_value_index_map(map);
            }

            if value.cells().len() >= count_of_cols {
                continue;
            }
            let row_index = value
                .cells()
                .first()
                .map(MatrixCell::row_index)
                .unwrap_or(position + offset);
            let row_key = value.key().map(str::to_string);
            let missing: Vec<MatrixCell> = (0..count_of_cols)
                .filter(|index| !value.cells().iter().any(|cell| cell.col_index() == *index))
                .map(|index| {
                    MatrixCell::new(
                        self.key.clone(),
                        row_key.clone(),
                        row_index,
                        index,
                        name_by_index.get(&index).map(|name| name.to_string()),
                        value.value_by_index(index).cloned().unwrap_or_default(),
                    )
                })
                .collect();
            value.cells_mut().extend(missing);
            value.cells_mut().sort_by_key(MatrixCell::col_index);
        }

        Ok(Matrix::from_parts(
            self.key,
            count_of_rows,
            count_of_cols,
            self.with_headers_row,
            self.columns,
            self.rows,
            self.values,
        ))
    }
}
