use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A literal cell value.
///
/// The enum uses an explicit `{type, value}` tagged layout so grids can be
/// described in configuration files or over IPC without ambiguity between,
/// say, the string `"true"` and the boolean `true`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellScalar {
    /// Empty / unset cell value.
    Empty,
    /// Plain text.
    Text(String),
    /// IEEE-754 double precision number.
    Number(f64),
    /// Boolean.
    Bool(bool),
    /// Calendar date (no time component).
    Date(NaiveDate),
}

impl Default for CellScalar {
    fn default() -> Self {
        CellScalar::Empty
    }
}

impl CellScalar {
    /// Returns true if the value is [`CellScalar::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, CellScalar::Empty)
    }

    /// Numeric view of the value, for mappings that fold over sibling cells.
    ///
    /// Text is parsed; booleans, dates and empty cells have no numeric view.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellScalar::Number(n) => Some(*n),
            CellScalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellScalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellScalar::Empty => Ok(()),
            CellScalar::Text(s) => f.write_str(s),
            CellScalar::Number(n) => write!(f, "{n}"),
            CellScalar::Bool(true) => f.write_str("TRUE"),
            CellScalar::Bool(false) => f.write_str("FALSE"),
            CellScalar::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<f64> for CellScalar {
    fn from(value: f64) -> Self {
        CellScalar::Number(value)
    }
}

impl From<i64> for CellScalar {
    fn from(value: i64) -> Self {
        CellScalar::Number(value as f64)
    }
}

impl From<i32> for CellScalar {
    fn from(value: i32) -> Self {
        CellScalar::Number(value as f64)
    }
}

impl From<bool> for CellScalar {
    fn from(value: bool) -> Self {
        CellScalar::Bool(value)
    }
}

impl From<String> for CellScalar {
    fn from(value: String) -> Self {
        CellScalar::Text(value)
    }
}

impl From<&str> for CellScalar {
    fn from(value: &str) -> Self {
        CellScalar::Text(value.to_string())
    }
}

impl From<NaiveDate> for CellScalar {
    fn from(value: NaiveDate) -> Self {
        CellScalar::Date(value)
    }
}

impl<T: Into<CellScalar>> From<Option<T>> for CellScalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellScalar::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_serde_layout() {
        let json = serde_json::to_string(&CellScalar::Number(12.5)).unwrap();
        assert_eq!(json, r#"{"type":"number","value":12.5}"#);
        let back: CellScalar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CellScalar::Number(12.5));
    }

    #[test]
    fn numeric_view_parses_text() {
        assert_eq!(CellScalar::from("12").as_number(), Some(12.0));
        assert_eq!(CellScalar::from(3).as_number(), Some(3.0));
        assert_eq!(CellScalar::Bool(true).as_number(), None);
        assert_eq!(CellScalar::Empty.as_number(), None);
    }

    #[test]
    fn text_view_only_covers_text() {
        assert_eq!(CellScalar::from("abc").as_text(), Some("abc"));
        assert_eq!(CellScalar::from(1).as_text(), None);
    }

    #[test]
    fn display_is_writer_friendly() {
        assert_eq!(CellScalar::from(42).to_string(), "42");
        assert_eq!(CellScalar::from(12.5).to_string(), "12.5");
        assert_eq!(CellScalar::Bool(false).to_string(), "FALSE");
        assert_eq!(CellScalar::Empty.to_string(), "");
    }
}
