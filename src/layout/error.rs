//! Error types for the layout model

use thiserror::Error;

use super::types::ItemKind;

/// Errors that can occur while building or mutating a layout
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Two items share the same identifier
    #[error("duplicate item id '{id}'")]
    DuplicateId { id: String },

    /// A serialized item carries a size that disagrees with its type
    #[error(
        "item '{id}' has size {width}x{height}, \
         but a {kind} is always {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        id: String,
        kind: ItemKind,
        width: f64,
        height: f64,
        expected_width: f64,
        expected_height: f64,
    },

    /// An item type name outside the closed set
    #[error("unknown item type '{name}' (valid types: {valid})")]
    UnknownKind { name: String, valid: String },

    /// Reference to an item that is not in the layout
    #[error("no item with id '{id}'")]
    UnknownItem { id: String },

    /// JSON encoding or decoding failed
    #[error("layout serialization error: {0}")]
    Serde(String),
}

impl LayoutError {
    /// Create a duplicate id error
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a dimension mismatch error for `kind`
    pub fn dimension_mismatch(
        id: impl Into<String>,
        kind: ItemKind,
        width: f64,
        height: f64,
    ) -> Self {
        let (expected_width, expected_height) = kind.dimensions();
        Self::DimensionMismatch {
            id: id.into(),
            kind,
            width,
            height,
            expected_width,
            expected_height,
        }
    }

    /// Create an unknown item type error listing the valid names
    pub fn unknown_kind(name: impl Into<String>) -> Self {
        Self::UnknownKind {
            name: name.into(),
            valid: ItemKind::ALL
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create an unknown item error
    pub fn unknown_item(id: impl Into<String>) -> Self {
        Self::UnknownItem { id: id.into() }
    }
}
