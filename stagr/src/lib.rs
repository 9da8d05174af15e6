//! # stagr - File Staging for Document Upload Forms
//!
//! Screen-agnostic staging area backing every "upload documents" form:
//! raw files arriving by drag-and-drop or a file picker are normalized into
//! an ordered store of entries carrying display metadata.
//!
//! ## Key Features
//! - Single normalization path for dropped and picked files
//! - Icon classification by extension
//! - Scoped image previews released exactly once
//! - Binary-unit size formatting
//! - Advisory or enforced upload policy

pub mod config;
pub mod error;
pub mod humanize;
pub mod intake;
pub mod item;
pub mod policy;
pub mod preview;
pub mod store;

// Re-export main types for easy use
pub use config::StagingConfig;
pub use error::{StageError, StageResult};
pub use humanize::{SizeMagnitude, format_size};
pub use intake::{DropZone, IntakeSource, non_empty, normalize};
pub use item::{FileKind, RawFile, StagedFile};
pub use policy::{PolicyMode, Screened, UploadPolicy};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use store::{StagedFileStore, size_of};
