//! Transient image previews with scoped ownership.
//!
//! A [`PreviewRegistry`] hands out [`PreviewHandle`]s and keeps the set of
//! handles that are still alive. A handle is not `Clone`; it is released
//! either explicitly through [`PreviewHandle::release`] or when it is
//! dropped, and the registry counts each release once.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashSet;
use compact_str::{CompactString, format_compact};
use parking_lot::Mutex;
use tracing::{trace, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct RegistryInner {
    live: AHashSet<Uuid>,
    allocated: u64,
    released: u64,
}

/// Allocator and bookkeeper for preview handles.
///
/// Cloning the registry shares the same bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl PreviewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a preview for `name`, optionally backed by a file on disk.
    #[must_use]
    pub fn allocate(&self, name: &str, source: Option<&Path>) -> PreviewHandle {
        let id = Uuid::new_v4();

        {
            let mut inner = self.inner.lock();
            inner.live.insert(id);
            inner.allocated += 1;
        }

        trace!(%id, name, "preview allocated");

        PreviewHandle {
            id,
            locator: format_compact!("preview://{id}"),
            source: source.map(Path::to_path_buf),
            registry: self.clone(),
            released: false,
        }
    }

    /// Number of handles currently alive.
    #[must_use]
    pub fn live(&self) -> usize {
        self.inner.lock().live.len()
    }

    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.inner.lock().allocated
    }

    #[must_use]
    pub fn released(&self) -> u64 {
        self.inner.lock().released
    }

    #[must_use]
    pub fn is_live(&self, id: &Uuid) -> bool {
        self.inner.lock().live.contains(id)
    }

    fn release_id(&self, id: &Uuid) -> bool {
        let mut inner = self.inner.lock();

        if inner.live.remove(id) {
            inner.released += 1;
            true
        } else {
            warn!(%id, "release requested for unknown preview");
            false
        }
    }
}

/// Exclusive owner of one transient preview.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    locator: CompactString,
    source: Option<PathBuf>,
    registry: PreviewRegistry,
    released: bool,
}

impl PreviewHandle {
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Opaque locator the display layer can use to refer to the preview.
    #[must_use]
    pub fn locator(&self) -> &str {
        &self.locator
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Release the preview now. Returns whether the registry still held it.
    pub fn release(mut self) -> bool {
        self.release_inner()
    }

    fn release_inner(&mut self) -> bool {
        if self.released {
            return false;
        }

        self.released = true;
        trace!(id = %self.id, "preview released");
        self.registry.release_id(&self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release_inner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_registers_a_live_handle() {
        let registry = PreviewRegistry::new();
        let handle = registry.allocate("photo.png", None);

        assert_eq!(registry.live(), 1);
        assert!(registry.is_live(&handle.id()));
        assert!(handle.locator().starts_with("preview://"));
        assert!(handle.source().is_none());
    }

    #[test]
    fn explicit_release_counts_once() {
        let registry = PreviewRegistry::new();
        let handle = registry.allocate("photo.png", Some(Path::new("/tmp/photo.png")));
        let id = handle.id();

        assert!(handle.release());
        assert!(!registry.is_live(&id));
        assert_eq!(registry.live(), 0);
        assert_eq!(registry.allocated(), 1);
        assert_eq!(registry.released(), 1);
    }

    #[test]
    fn drop_releases_handle() {
        let registry = PreviewRegistry::new();
        {
            let _a = registry.allocate("a.png", None);
            let _b = registry.allocate("b.jpg", None);
            assert_eq!(registry.live(), 2);
        }

        assert_eq!(registry.live(), 0);
        assert_eq!(registry.released(), 2);
    }

    #[test]
    fn handles_have_distinct_ids() {
        let registry = PreviewRegistry::new();
        let a = registry.allocate("same.png", None);
        let b = registry.allocate("same.png", None);

        assert_ne!(a.id(), b.id());
        assert_ne!(a.locator(), b.locator());
    }
}
