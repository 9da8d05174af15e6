//! src/fs/intake.rs
//! ============================================================================
//! # Reading dropped and picked files from disk
//!
//! Terminals deliver a drag-and-drop as a bracketed paste of paths. The
//! picker prompt yields the same kind of text. Both are split into paths
//! here and read into [`RawFile`]s: size from metadata, type sniffed from
//! the first bytes with `infer`, falling back to the extension.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use stagr::{RawFile, item::extension_of};
use tokio::{fs as TokioFs, io::AsyncReadExt};
use tracing::{debug, instrument, warn};

use crate::error::AppError;

/// Bytes read for content sniffing.
const SNIFF_LEN: usize = 8192;

/// A path that could not be staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ReadOutcome {
    pub files: Vec<RawFile>,
    pub failures: Vec<IntakeFailure>,
}

/// Split pasted or typed text into paths.
///
/// Handles whitespace- and newline-separated lists, single and double
/// quotes, backslash-escaped spaces and `file://` URIs.
pub fn parse_paths(text: &str) -> Vec<PathBuf> {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_token = true;
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(ch);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }

    tokens
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(|t| match t.strip_prefix("file://") {
            Some(rest) => PathBuf::from(percent_decode_str(rest).decode_utf8_lossy().into_owned()),
            None => PathBuf::from(t),
        })
        .collect()
}

/// Paths from a paste, treating the whole text as one path when it names
/// an existing file (unquoted names with spaces).
pub async fn resolve_paste(text: &str) -> Vec<PathBuf> {
    let whole = text.trim();
    if !whole.is_empty()
        && !whole.contains('\n')
        && TokioFs::metadata(whole).await.is_ok_and(|m| m.is_file())
    {
        return vec![PathBuf::from(whole)];
    }
    parse_paths(text)
}

/// Read every path, collecting failures instead of stopping at the first.
#[instrument(level = "debug", skip(paths), fields(count = paths.len()))]
pub async fn read_files(paths: Vec<PathBuf>) -> ReadOutcome {
    let mut outcome = ReadOutcome::default();

    for path in paths {
        match read_file(&path).await {
            Ok(file) => outcome.files.push(file),
            Err(e) => {
                warn!(path = %path.display(), "cannot stage: {e}");
                outcome.failures.push(IntakeFailure {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        read = outcome.files.len(),
        failed = outcome.failures.len(),
        "intake read finished"
    );
    outcome
}

pub async fn read_file(path: &Path) -> Result<RawFile, AppError> {
    let metadata = TokioFs::metadata(path)
        .await
        .map_err(|e| AppError::file_metadata(path, e))?;

    if !metadata.is_file() {
        return Err(AppError::NotAFile(path.to_path_buf()));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mime_type = match sniff(path).await {
        Some(sniffed) => sniffed.to_string(),
        None => mime_from_name(&name).map(|m| m.to_string()).unwrap_or_default(),
    };

    Ok(RawFile::new(name, metadata.len(), mime_type).with_source(path))
}

async fn sniff(path: &Path) -> Option<&'static str> {
    let mut file = TokioFs::File::open(path).await.ok()?;
    let mut buf = vec![0u8; SNIFF_LEN];
    let n = file.read(&mut buf).await.ok()?;
    infer::get(&buf[..n]).map(|kind| kind.mime_type())
}

/// Declared type by extension, used when content sniffing finds nothing.
pub fn mime_from_name(name: &str) -> Option<mime::Mime> {
    let ext = extension_of(name)?;
    let known = match ext.as_str() {
        "pdf" => mime::APPLICATION_PDF,
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "svg" => mime::IMAGE_SVG,
        "txt" => mime::TEXT_PLAIN,
        "csv" => mime::TEXT_CSV,
        "xml" => mime::TEXT_XML,
        "json" => mime::APPLICATION_JSON,
        other => {
            let essence = match other {
                "doc" => "application/msword",
                "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "xls" => "application/vnd.ms-excel",
                "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "webp" => "image/webp",
                "tif" | "tiff" => "image/tiff",
                _ => return None,
            };
            return essence.parse().ok();
        }
    };
    Some(known)
}
