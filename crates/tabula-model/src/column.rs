use serde::{Deserialize, Serialize};

use crate::format::{Format, SharedFormat};
use crate::key::ColumnKey;

/// Declared type of a column's values, used by writers to pick the native
/// cell API for literals.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    Text,
    Number,
    Boolean,
    Date,
    Formula,
}

/// Declarative metadata for one column.
///
/// `index` is assigned from declaration order at build time when unset and is
/// never reassigned afterwards, except for the index shift applied to
/// right-hand columns during horizontal concatenation. `key` is assigned once
/// the owning grid is known.
#[derive(Clone, Debug, Default)]
pub struct ColumnDefinition {
    pub name: String,
    pub label: Option<String>,
    pub data_type: DataType,
    pub index: Option<usize>,
    pub header_format: Option<SharedFormat>,
    pub key: Option<ColumnKey>,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_header_format(mut self, format: impl Format) -> Self {
        self.header_format = Some(std::sync::Arc::new(format));
        self
    }

    /// Display text for the header cell; falls back to the column name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

impl From<&str> for ColumnDefinition {
    fn from(name: &str) -> Self {
        ColumnDefinition::new(name)
    }
}

impl From<String> for ColumnDefinition {
    fn from(name: String) -> Self {
        ColumnDefinition::new(name)
    }
}
