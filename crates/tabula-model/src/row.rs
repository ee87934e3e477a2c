use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::cell::MatrixCell;
use crate::format::{Format, SharedFormat};
use crate::matrix::Matrix;
use crate::value::CellScalar;

/// Derived-value function attached to one `(row key, column name)` slot.
///
/// Invoked lazily at render time with the owning grid and the cell being
/// resolved; it may navigate to sibling cells through the grid's readers.
/// Mappings must be pure with respect to the grid's resolved values, since a
/// grid rendered twice invokes them twice.
pub type ValueMapping = Arc<dyn Fn(&Matrix, &MatrixCell) -> CellScalar + Send + Sync>;

/// Declarative metadata attached to a row key: a default cell format,
/// per-column formats, and per-column value mappings.
#[derive(Clone)]
pub struct RowDefinition {
    key: String,
    default_format: Option<SharedFormat>,
    formats_by_col_name: BTreeMap<String, SharedFormat>,
    formats_by_col_index: BTreeMap<usize, SharedFormat>,
    value_mappings: BTreeMap<String, ValueMapping>,
}

impl RowDefinition {
    /// Sentinel key for the definition that applies when no specific row
    /// matches.
    pub const DEFAULT_KEY: &'static str = "__default__";

    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            default_format: None,
            formats_by_col_name: BTreeMap::new(),
            formats_by_col_index: BTreeMap::new(),
            value_mappings: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_default(&self) -> bool {
        self.key == Self::DEFAULT_KEY
    }

    pub fn with_default_format(mut self, format: impl Format) -> Self {
        self.default_format = Some(Arc::new(format));
        self
    }

    /// Attach a per-column format by column name. The name is translated to a
    /// column index when the owning grid is built.
    pub fn with_format(mut self, col_name: impl Into<String>, format: impl Format) -> Self {
        self.formats_by_col_name.insert(col_name.into(), Arc::new(format));
        self
    }

    /// Attach a per-column format directly by column index.
    pub fn with_format_at(mut self, col_index: usize, format: impl Format) -> Self {
        self.formats_by_col_index.insert(col_index, Arc::new(format));
        self
    }

    /// Attach a derived-value mapping for a column.
    pub fn with_value_map<F>(mut self, col_name: impl Into<String>, mapping: F) -> Self
    where
        F: Fn(&Matrix, &MatrixCell) -> CellScalar + Send + Sync + 'static,
    {
        self.value_mappings.insert(col_name.into(), Arc::new(mapping));
        self
    }

    pub fn default_format(&self) -> Option<&dyn Format> {
        self.default_format.as_deref()
    }

    pub fn format_for_col(&self, col_index: usize) -> Option<&dyn Format> {
        self.formats_by_col_index.get(&col_index).map(Arc::as_ref)
    }

    pub fn mapping_for(&self, col_name: &str) -> Option<&ValueMapping> {
        self.value_mappings.get(col_name)
    }

    pub(crate) fn formats_by_col_name(&self) -> &BTreeMap<String, SharedFormat> {
        &self.formats_by_col_name
    }

    pub(crate) fn formats_by_col_index(&self) -> &BTreeMap<usize, SharedFormat> {
        &self.formats_by_col_index
    }

    pub(crate) fn insert_format(&mut self, col_name: String, format: SharedFormat) {
        self.formats_by_col_name.insert(col_name, format);
    }

    pub(crate) fn insert_mapping(&mut self, col_name: String, mapping: ValueMapping) {
        self.value_mappings.insert(col_name, mapping);
    }

    pub(crate) fn set_default_format_shared(&mut self, format: SharedFormat) {
        self.default_format = Some(format);
    }

    /// Install the index map derived from the name map at build time.
    pub(crate) fn set_format_index_map(&mut self, map: BTreeMap<usize, SharedFormat>) {
        self.formats_by_col_index = map;
    }

    /// Shift every per-column-index format right by `offset`. Only
    /// concatenation rewrites the map after it has been derived.
    pub(crate) fn shift_format_indices(&mut self, offset: usize) {
        let shifted = std::mem::take(&mut self.formats_by_col_index)
            .into_iter()
            .map(|(index, format)| (index + offset, format))
            .collect();
        self.formats_by_col_index = shifted;
    }

    /// Fold another definition's per-column formats into this one, keeping
    /// existing entries, but only for columns at `min_index` or beyond.
    pub(crate) fn fold_formats_from(&mut self, other: &RowDefinition, min_index: usize) {
        for (&index, format) in &other.formats_by_col_index {
            if index >= min_index {
                self.formats_by_col_index
                    .entry(index)
                    .or_insert_with(|| Arc::clone(format));
            }
        }
    }
}

impl Default for RowDefinition {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY)
    }
}

impl fmt::Debug for RowDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowDefinition")
            .field("key", &self.key)
            .field("default_format", &self.default_format)
            .field("formats_by_col_name", &self.formats_by_col_name)
            .field("formats_by_col_index", &self.formats_by_col_index)
            .field(
                "value_mappings",
                &self.value_mappings.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// The literal data for one row, keyed to a [`RowDefinition`] by row key.
///
/// Rows are materialized dense at build time: `cells` holds exactly one
/// [`MatrixCell`] per column of the owning grid, with
/// [`CellScalar::Empty`] for columns the row does not mention. The by-index
/// map is derived once from the by-name map, then only rewritten by
/// concatenation.
#[derive(Clone, Debug, Default)]
pub struct RowValue {
    key: Option<String>,
    values_by_col_name: BTreeMap<String, CellScalar>,
    values_by_col_index: BTreeMap<usize, CellScalar>,
    cells: Vec<MatrixCell>,
}

impl RowValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyed(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Set a literal value for a named column.
    pub fn set(mut self, col_name: impl Into<String>, value: impl Into<CellScalar>) -> Self {
        self.values_by_col_name.insert(col_name.into(), value.into());
        self
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn value_by_name(&self, col_name: &str) -> Option<&CellScalar> {
        self.values_by_col_name.get(col_name)
    }

    pub fn value_by_index(&self, col_index: usize) -> Option<&CellScalar> {
        self.values_by_col_index.get(&col_index)
    }

    /// Dense cell list, one entry per column of the owning grid.
    pub fn cells(&self) -> &[MatrixCell] {
        &self.cells
    }

    pub(crate) fn values_by_col_name(&self) -> &BTreeMap<String, CellScalar> {
        &self.values_by_col_name
    }

    pub(crate) fn values_by_col_index(&self) -> &BTreeMap<usize, CellScalar> {
        &self.values_by_col_index
    }

    pub(crate) fn set_value_index_map(&mut self, map: BTreeMap<usize, CellScalar>) {
        self.values_by_col_index = map;
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Vec<MatrixCell> {
        &mut self.cells
    }

    /// Merge another row's by-index values into this one, shifted right by
    /// `offset`, without overwriting existing entries.
    pub(crate) fn merge_shifted_values(&mut self, other: &RowValue, offset: usize) {
        for (&index, value) in &other.values_by_col_index {
            self.values_by_col_index
                .entry(index + offset)
                .or_insert_with(|| value.clone());
        }
    }

    /// Shift this row's own by-index values right by `offset`.
    pub(crate) fn shift_value_indices(&mut self, offset: usize) {
        let shifted = std::mem::take(&mut self.values_by_col_index)
            .into_iter()
            .map(|(index, value)| (index + offset, value))
            .collect();
        self.values_by_col_index = shifted;
    }
}
