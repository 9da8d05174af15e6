//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Document Exchange Client
//!
//! Each variant carries enough context to show a notification or write a
//! useful log line. Modules return `Result<T, AppError>`; the binary wraps
//! these with `anyhow` context at the edge.

use std::{io, path::PathBuf};
use stagr::StageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error retrieving metadata for a picked or dropped file.
    #[error("Cannot read {path:?}: {source}")]
    FileMetadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path exists but is not a regular file.
    #[error("Not a file: {0:?}")]
    NotAFile(PathBuf),

    /// Staging area error (removal out of range, policy violation, ...).
    #[error(transparent)]
    Staging(#[from] StageError),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No platform config directory could be determined.
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,

    /// Route path that does not match any screen.
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    /// Form field failed validation.
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    /// Entity lookup by id failed.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Terminal I/O or rendering error.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Logging setup failure.
    #[error("Logging error: {0}")]
    Logging(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create an input validation error
    pub fn invalid_input<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a lookup failure error
    pub fn not_found<S: Into<String>>(entity: &'static str, id: S) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a file metadata error
    pub fn file_metadata<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::FileMetadata {
            path: path.into(),
            source,
        }
    }

    /// Errors that only warrant a warning notification.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Staging(_)
            | Self::FileMetadata { .. }
            | Self::NotAFile(_)
            | Self::InvalidInput { .. }
            | Self::NotFound { .. }
            | Self::UnknownRoute(_) => true,
            _ => false,
        }
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_errors_pass_through_display() {
        let err: AppError = StageError::IndexOutOfBounds { index: 4, len: 2 }.into();
        assert_eq!(err.to_string(), "No staged file at index 4 (store holds 2)");
        assert!(err.is_recoverable());
    }

    #[test]
    fn validation_errors_are_recoverable() {
        let err = AppError::invalid_input("number", "required");
        assert_eq!(err.to_string(), "Invalid input: number - required");
        assert!(err.is_recoverable());
        assert!(!AppError::ConfigDirUnavailable.is_recoverable());
    }
}
