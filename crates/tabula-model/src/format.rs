use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::row::RowDefinition;

/// A cell format of some renderer-specific kind.
///
/// Formats are opaque capability bags: the model stores and cascades them
/// without interpreting their contents. Each renderer ecosystem contributes
/// one concrete type (identified by [`Format::kind`]); a format applier built
/// for one kind skips formats of other kinds while collecting the cascade,
/// but refuses them when asked to apply one directly.
pub trait Format: Any + fmt::Debug + Send + Sync {
    /// Capability tag naming the concrete kind, e.g. `"basic"`.
    fn kind(&self) -> &'static str;

    /// Downcast support for appliers.
    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a format; grids clone these freely during concatenation.
pub type SharedFormat = Arc<dyn Format>;

/// Raised when a format of one kind is handed directly to an applier of
/// another kind. Silently dropping the format would be a correctness bug, so
/// the mismatch is loud.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format kind mismatch: applier handles {expected:?}, got {actual:?}")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Collect the format cascade for one cell, least specific first:
///
/// 1. default format of the default row,
/// 2. per-column format of the default row,
/// 3. default format of the current row,
/// 4. per-column format of the current row.
///
/// Absent layers are skipped, as are formats of kinds other than `F`.
pub fn formats_in_cascade_order<'a, F: Format>(
    default_row: &'a RowDefinition,
    current_row: &'a RowDefinition,
    col_index: usize,
) -> Vec<&'a F> {
    let mut ordered = Vec::new();
    let mut push = |format: Option<&'a dyn Format>| {
        if let Some(concrete) = format.and_then(|f| f.as_any().downcast_ref::<F>()) {
            ordered.push(concrete);
        }
    };

    push(default_row.default_format());
    push(default_row.format_for_col(col_index));
    push(current_row.default_format());
    push(current_row.format_for_col(col_index));
    ordered
}

/// Font style used by [`BasicFormat`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    Bold,
    Italic,
    Strikeout,
}

/// Portable style bag understood by every renderer ecosystem.
///
/// Unlike native format kinds, which merge whole-object (most specific layer
/// wins), `BasicFormat` merges per attribute: each attribute independently
/// takes the last non-empty value while folding over the cascade. A row-level
/// layer can therefore set the font size while a more specific layer
/// overrides only the background color.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    /// Color token interpreted by the target writer (palette index or hex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl BasicFormat {
    pub const KIND: &'static str = "basic";

    /// Attribute-level merge, least specific first.
    pub fn merged<'a, I>(formats: I) -> Option<BasicFormat>
    where
        I: IntoIterator<Item = &'a BasicFormat>,
    {
        let mut iter = formats.into_iter();
        let first = iter.next()?;
        let mut merged = first.clone();
        for next in iter {
            if next.font_size.is_some() {
                merged.font_size = next.font_size;
            }
            if next.font_style.is_some() {
                merged.font_style = next.font_style;
            }
            if next.background_color.is_some() {
                merged.background_color = next.background_color.clone();
            }
        }
        Some(merged)
    }
}

impl Format for BasicFormat {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn merge_takes_last_non_empty_value_per_attribute() {
        let f1 = BasicFormat {
            background_color: Some("123".into()),
            font_size: Some(10),
            font_style: Some(FontStyle::Bold),
        };
        let f2 = BasicFormat {
            background_color: Some("234".into()),
            font_size: Some(12),
            ..Default::default()
        };
        let f3 = BasicFormat {
            font_size: Some(14),
            ..Default::default()
        };

        let merged = BasicFormat::merged([&f1, &f2, &f3]).unwrap();
        assert_eq!(merged.background_color.as_deref(), Some("234"));
        assert_eq!(merged.font_size, Some(14));
        assert_eq!(merged.font_style, Some(FontStyle::Bold));
    }

    #[test]
    fn merge_of_nothing_is_none() {
        let empty: [&BasicFormat; 0] = [];
        assert_eq!(BasicFormat::merged(empty), None);
    }

    #[test]
    fn cascade_skips_foreign_kinds_and_absent_layers() {
        #[derive(Debug)]
        struct OtherFormat;
        impl Format for OtherFormat {
            fn kind(&self) -> &'static str {
                "other"
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let default_row = RowDefinition::default().with_default_format(BasicFormat {
            font_size: Some(12),
            ..Default::default()
        });
        let row = RowDefinition::new("current")
            .with_default_format(OtherFormat)
            .with_format_at(
                0,
                BasicFormat {
                    background_color: Some("7".into()),
                    ..Default::default()
                },
            );

        let ordered = formats_in_cascade_order::<BasicFormat>(&default_row, &row, 0);
        assert_eq!(ordered.len(), 2);
        let merged = BasicFormat::merged(ordered).unwrap();
        assert_eq!(merged.font_size, Some(12));
        assert_eq!(merged.background_color.as_deref(), Some("7"));
    }
}
