//! Staging error types

use compact_str::CompactString;
use thiserror::Error;

pub type StageResult<T> = Result<T, StageError>;

/// Errors reported by the staging area and its upload policy.
///
/// All of them are recoverable: the form shows a warning and stays usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("No staged file at index {index} (store holds {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("File {name} is {size} bytes, maximum allowed is {max} bytes")]
    FileTooLarge {
        name: CompactString,
        size: u64,
        max: u64,
    },

    #[error("File type not accepted: {name}")]
    UnsupportedType {
        name: CompactString,
        extension: Option<CompactString>,
    },

    #[error("Intake batch is empty")]
    EmptyBatch,
}

impl StageError {
    /// True for the conditions produced by [`crate::policy::UploadPolicy::check`].
    #[inline]
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            StageError::FileTooLarge { .. } | StageError::UnsupportedType { .. }
        )
    }

    #[inline]
    pub fn file_too_large(name: &str, size: u64, max: u64) -> Self {
        Self::FileTooLarge {
            name: CompactString::from(name),
            size,
            max,
        }
    }

    #[inline]
    pub fn unsupported_type(name: &str, extension: Option<&str>) -> Self {
        Self::UnsupportedType {
            name: CompactString::from(name),
            extension: extension.map(CompactString::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_policy_checks_count_as_violations() {
        assert!(StageError::file_too_large("scan.pdf", 60, 50).is_policy_violation());
        assert!(StageError::unsupported_type("notes.txt", Some("txt")).is_policy_violation());
        assert!(!StageError::EmptyBatch.is_policy_violation());
        assert!(!StageError::IndexOutOfBounds { index: 1, len: 0 }.is_policy_violation());
    }

    #[test]
    fn unsupported_type_keeps_extension() {
        let err = StageError::unsupported_type("Makefile", None);
        assert_eq!(err.to_string(), "File type not accepted: Makefile");
        assert!(matches!(err, StageError::UnsupportedType { extension: None, .. }));
    }
}
