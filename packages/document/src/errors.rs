//! Error types for documents and key paths

use thiserror::Error;

/// Failure to turn YAML text into a document or back
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Document is corrupt: {0}")]
    Corrupt(String),

    #[error("Unsupported mapping key: {0}")]
    UnsupportedKey(String),

    #[error("Failed to serialize document: {0}")]
    Serialize(String),
}

/// Failure to resolve a key path inside a document.
///
/// For `NotFound` and `IndexOutOfRange`, `path` is the requested path cut
/// after the segment that failed, so a missing `missing` under an existing
/// `app` reports `app.missing`. For `TypeConflict`, `path` names the node
/// whose type was wrong.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Invalid key path '{path}': {reason}")]
    Invalid { path: String, reason: String },

    #[error("Key '{path}' not found")]
    NotFound { path: String },

    #[error("Index out of range at '{path}': index {index}, sequence length {len}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("Type conflict at '{path}': expected {expected}, found {found}")]
    TypeConflict {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl PathError {
    /// Path prefix the error refers to
    pub fn path(&self) -> &str {
        match self {
            PathError::Invalid { path, .. }
            | PathError::NotFound { path }
            | PathError::IndexOutOfRange { path, .. }
            | PathError::TypeConflict { path, .. } => path,
        }
    }
}
