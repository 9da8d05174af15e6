use std::path::{Path, PathBuf};

use compact_str::CompactString;

use crate::humanize::format_size;
use crate::preview::PreviewHandle;

/// Display icon class, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Document,
    Spreadsheet,
    Image,
    Generic,
}

impl FileKind {
    /// Classify by extension, case-insensitively. Unknown or missing
    /// extensions fall back to [`FileKind::Generic`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        extension_of(name).map_or(Self::Generic, |ext| Self::from_extension(&ext))
    }

    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" | "doc" | "docx" => Self::Document,
            "xls" | "xlsx" => Self::Spreadsheet,
            "jpg" | "jpeg" | "png" => Self::Image,
            _ => Self::Generic,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Spreadsheet => "spreadsheet",
            Self::Image => "image",
            Self::Generic => "file",
        }
    }
}

/// Lower-cased extension of a file name, if it has one.
#[must_use]
pub fn extension_of(name: &str) -> Option<CompactString> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| CompactString::from(ext.to_ascii_lowercase()))
}

/// True when the declared type belongs to the `image` category.
#[must_use]
pub fn is_image_mime(mime_type: &str) -> bool {
    match mime_type.trim().parse::<mime::Mime>() {
        Ok(parsed) => parsed.type_() == mime::IMAGE,
        Err(_) => mime_type.trim().to_ascii_lowercase().starts_with("image/"),
    }
}

/// A file as handed over by either intake path, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: CompactString,
    pub size_bytes: u64,
    /// Declared type; empty when unknown.
    pub mime_type: CompactString,
    pub source: Option<PathBuf>,
}

impl RawFile {
    pub fn new(
        name: impl Into<CompactString>,
        size_bytes: u64,
        mime_type: impl Into<CompactString>,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    #[must_use]
    pub fn extension(&self) -> Option<CompactString> {
        extension_of(&self.name)
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        is_image_mime(&self.mime_type)
    }
}

/// One entry of the staging area.
#[derive(Debug)]
pub struct StagedFile {
    pub name: CompactString,
    pub size_bytes: u64,
    pub mime_type: CompactString,
    pub kind: FileKind,
    pub source: Option<PathBuf>,
    preview: Option<PreviewHandle>,
}

impl StagedFile {
    pub(crate) fn from_raw(raw: RawFile, preview: Option<PreviewHandle>) -> Self {
        let kind = FileKind::from_name(&raw.name);

        Self {
            name: raw.name,
            size_bytes: raw.size_bytes,
            mime_type: raw.mime_type,
            kind,
            source: raw.source,
            preview,
        }
    }

    #[must_use]
    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    #[must_use]
    pub fn has_preview(&self) -> bool {
        self.preview.is_some()
    }

    #[must_use]
    pub fn display_size(&self) -> String {
        format_size(self.size_bytes)
    }

    /// Release the owned preview, if any. Returns whether one was held.
    pub(crate) fn release_preview(&mut self) -> bool {
        self.preview.take().is_some_and(PreviewHandle::release)
    }
}
