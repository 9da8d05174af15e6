//! Intake surface: drag-and-drop and file-picker input converge on
//! [`normalize`].

use std::fmt;

use tracing::debug;

use crate::error::{StageError, StageResult};
use crate::item::{RawFile, StagedFile};
use crate::preview::PreviewRegistry;

/// Where a batch of files came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntakeSource {
    Drop,
    Picker,
}

impl fmt::Display for IntakeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop => write!(f, "drop"),
            Self::Picker => write!(f, "picker"),
        }
    }
}

/// Turn raw inputs into staged entries, preserving arrival order.
///
/// Nothing is rejected here. Image types get a preview handle, everything
/// else gets none.
pub fn normalize<I>(batch: I, registry: &PreviewRegistry) -> Vec<StagedFile>
where
    I: IntoIterator<Item = RawFile>,
{
    batch
        .into_iter()
        .map(|raw| {
            let preview = raw
                .is_image()
                .then(|| registry.allocate(&raw.name, raw.source.as_deref()));

            StagedFile::from_raw(raw, preview)
        })
        .collect()
}

/// Drag highlight state of a drop target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropZone {
    active: bool,
}

impl DropZone {
    #[must_use]
    pub const fn new() -> Self {
        Self { active: false }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn drag_enter(&mut self) {
        self.active = true;
    }

    pub const fn drag_over(&mut self) {
        self.active = true;
    }

    pub const fn drag_leave(&mut self) {
        self.active = false;
    }

    /// Finish a drag. A drop carrying no files is [`StageError::EmptyBatch`].
    pub fn drop(&mut self, batch: Vec<RawFile>) -> StageResult<Vec<RawFile>> {
        self.active = false;
        non_empty(batch)
    }
}

/// Reject a batch with no files in it.
pub fn non_empty(batch: Vec<RawFile>) -> StageResult<Vec<RawFile>> {
    if batch.is_empty() {
        debug!("empty batch");
        Err(StageError::EmptyBatch)
    } else {
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::FileKind;

    #[test]
    fn normalize_preserves_order_and_allocates_image_previews() {
        let registry = PreviewRegistry::new();
        let staged = normalize(
            vec![
                RawFile::new("contract.pdf", 100, "application/pdf"),
                RawFile::new("scan.png", 200, "image/png"),
                RawFile::new("table.xlsx", 300, ""),
                RawFile::new("photo.jpg", 400, "image/jpeg"),
            ],
            &registry,
        );

        let names: Vec<&str> = staged.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["contract.pdf", "scan.png", "table.xlsx", "photo.jpg"]);

        let previews: Vec<bool> = staged.iter().map(StagedFile::has_preview).collect();
        assert_eq!(previews, [false, true, false, true]);
        assert_eq!(registry.live(), 2);

        assert_eq!(staged[2].kind, FileKind::Spreadsheet);
    }

    #[test]
    fn preview_follows_declared_type_not_extension() {
        let registry = PreviewRegistry::new();
        let staged = normalize(
            vec![
                RawFile::new("looks-like.png", 1, "application/octet-stream"),
                RawFile::new("no-extension", 1, "image/webp"),
            ],
            &registry,
        );

        assert!(!staged[0].has_preview());
        assert_eq!(staged[0].kind, FileKind::Image);
        assert!(staged[1].has_preview());
        assert_eq!(staged[1].kind, FileKind::Generic);
    }

    #[test]
    fn drop_zone_tracks_drag_state() {
        let mut zone = DropZone::new();
        zone.drag_enter();
        assert!(zone.is_active());
        zone.drag_leave();
        assert!(!zone.is_active());
        zone.drag_over();

        let batch = zone.drop(vec![RawFile::new("a.pdf", 1, "application/pdf")]);
        assert!(!zone.is_active());
        assert_eq!(batch.map(|b| b.len()), Ok(1));

        zone.drag_enter();
        assert_eq!(zone.drop(Vec::new()), Err(StageError::EmptyBatch));
        assert!(!zone.is_active());
    }
}
