//! Error types for notipress.
//!
//! Library crates use [`NotipressError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all notipress operations.
#[derive(Debug, thiserror::Error)]
pub enum NotipressError {
    /// Configuration loading or validation error. Fatal at startup;
    /// never recoverable per request.
    #[error("config error: {message}")]
    Config { message: String },

    /// A named property is absent from a record's property set.
    /// Fails the whole digest build for the request.
    #[error("missing field: {field}")]
    MissingField { field: String },

    /// A property's discriminant does not match the shape required for
    /// its role. Carries the observed discriminant for diagnosability.
    #[error("unexpected shape for field {field}: got {found}")]
    UnexpectedShape { field: String, found: String },

    /// Transport or API error from the content store, propagated unchanged.
    /// Retry policy, if any, belongs to a surrounding collaborator.
    #[error("store error: {0}")]
    Store(String),

    /// Filesystem I/O error (config file, stylesheet).
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, NotipressError>;

impl NotipressError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a missing-field error for the given property name.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an unexpected-shape error naming the field and the
    /// discriminant actually found.
    pub fn unexpected_shape(field: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            field: field.into(),
            found: found.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
