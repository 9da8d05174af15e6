//! Upload constraints advertised to the user.
//!
//! In [`PolicyMode::Advisory`] (the default) nothing is rejected; violations
//! are only reported so the form can show them. [`PolicyMode::Enforced`]
//! drops violating files from the batch.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{StageError, StageResult};
use crate::humanize::{MIB, format_size};
use crate::item::RawFile;

pub const DEFAULT_ACCEPTED_EXTENSIONS: [&str; 8] =
    ["pdf", "doc", "docx", "xls", "xlsx", "jpg", "jpeg", "png"];

pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * MIB;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    #[default]
    Advisory,

    Enforced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// Lower-case extensions without the leading dot
    pub accepted_extensions: Vec<CompactString>,

    /// Per-file limit in bytes
    pub max_file_size: u64,

    #[serde(default)]
    pub mode: PolicyMode,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accepted_extensions: DEFAULT_ACCEPTED_EXTENSIONS
                .iter()
                .map(|ext| CompactString::from(*ext))
                .collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            mode: PolicyMode::Advisory,
        }
    }
}

/// Result of running a batch through the policy.
#[derive(Debug, Default)]
pub struct Screened {
    pub accepted: Vec<RawFile>,
    pub warnings: Vec<StageError>,
}

impl UploadPolicy {
    /// Picker filter string, e.g. `.pdf,.doc,.docx`.
    #[must_use]
    pub fn accept_hint(&self) -> String {
        self.accepted_extensions
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// User-facing line listing accepted formats and the size limit.
    #[must_use]
    pub fn describe(&self) -> String {
        let formats = self
            .accepted_extensions
            .iter()
            .map(|ext| ext.to_uppercase())
            .collect::<Vec<_>>()
            .join(", ");

        let limit = if self.max_file_size % MIB == 0 {
            format!("{} МБ", self.max_file_size / MIB)
        } else {
            format_size(self.max_file_size)
        };

        format!("Поддерживаются: {formats} (макс. {limit})")
    }

    #[must_use]
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.accepted_extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(ext))
    }

    /// Check one file against the size limit and the extension list.
    pub fn check(&self, file: &RawFile) -> StageResult<()> {
        if file.size_bytes > self.max_file_size {
            return Err(StageError::file_too_large(
                &file.name,
                file.size_bytes,
                self.max_file_size,
            ));
        }

        let ext = file.extension();
        match ext.as_deref() {
            Some(ext) if self.accepts_extension(ext) => Ok(()),
            other => Err(StageError::unsupported_type(&file.name, other)),
        }
    }

    /// Run a batch through the policy according to its mode.
    pub fn screen(&self, batch: Vec<RawFile>) -> Screened {
        let mut screened = Screened::default();

        for file in batch {
            match self.check(&file) {
                Ok(()) => screened.accepted.push(file),
                Err(violation) => {
                    warn!(name = %file.name, mode = ?self.mode, "{violation}");
                    screened.warnings.push(violation);

                    if self.mode == PolicyMode::Advisory {
                        screened.accepted.push(file);
                    }
                }
            }
        }

        screened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hint_matches_picker_filter() {
        let policy = UploadPolicy::default();

        assert_eq!(
            policy.accept_hint(),
            ".pdf,.doc,.docx,.xls,.xlsx,.jpg,.jpeg,.png"
        );
        assert_eq!(
            policy.describe(),
            "Поддерживаются: PDF, DOC, DOCX, XLS, XLSX, JPG, JPEG, PNG (макс. 50 МБ)"
        );
    }

    #[test]
    fn check_reports_size_before_type() {
        let policy = UploadPolicy::default();

        assert!(policy.check(&RawFile::new("a.PDF", 10, "application/pdf")).is_ok());
        assert_eq!(
            policy.check(&RawFile::new("huge.txt", DEFAULT_MAX_FILE_SIZE + 1, "")),
            Err(StageError::file_too_large(
                "huge.txt",
                DEFAULT_MAX_FILE_SIZE + 1,
                DEFAULT_MAX_FILE_SIZE
            ))
        );
        assert_eq!(
            policy.check(&RawFile::new("notes.txt", 1, "text/plain")),
            Err(StageError::unsupported_type("notes.txt", Some("txt")))
        );
        assert_eq!(
            policy.check(&RawFile::new("Makefile", 1, "")),
            Err(StageError::unsupported_type("Makefile", None))
        );
    }

    #[test]
    fn advisory_mode_keeps_everything() {
        let policy = UploadPolicy::default();
        let screened = policy.screen(vec![
            RawFile::new("a.pdf", 1, "application/pdf"),
            RawFile::new("b.exe", 1, ""),
        ]);

        assert_eq!(screened.accepted.len(), 2);
        assert_eq!(screened.warnings.len(), 1);
    }

    #[test]
    fn enforced_mode_drops_violations() {
        let policy = UploadPolicy {
            mode: PolicyMode::Enforced,
            max_file_size: 100,
            ..UploadPolicy::default()
        };
        let screened = policy.screen(vec![
            RawFile::new("a.pdf", 1, "application/pdf"),
            RawFile::new("b.exe", 1, ""),
            RawFile::new("c.png", 101, "image/png"),
        ]);

        let names: Vec<&str> = screened.accepted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.pdf"]);
        assert_eq!(screened.warnings.len(), 2);
    }

    #[test]
    fn odd_limits_fall_back_to_formatted_size() {
        let policy = UploadPolicy {
            max_file_size: 1536,
            ..UploadPolicy::default()
        };
        assert!(policy.describe().ends_with("(макс. 1.5 КБ)"));
    }
}
