//! Ordered staging area owned by a single form screen.
//!
//! Entries are identified by position only. Every exit path (removal,
//! [`StagedFileStore::clear`], [`StagedFileStore::teardown`] or drop)
//! releases the previews the removed entries own.

use tracing::{debug, info, instrument};

use crate::error::{StageError, StageResult};
use crate::humanize::format_size;
use crate::intake::{IntakeSource, normalize};
use crate::item::{RawFile, StagedFile};
use crate::preview::PreviewRegistry;

/// Human-readable size of a staged entry.
#[must_use]
pub fn size_of(entry: &StagedFile) -> String {
    format_size(entry.size_bytes)
}

#[derive(Debug, Default)]
pub struct StagedFileStore {
    entries: Vec<StagedFile>,
}

impl StagedFileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entries at the end. Duplicate names are kept as separate
    /// entries. Returns how many were added.
    pub fn append<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = StagedFile>,
    {
        let before = self.entries.len();
        self.entries.extend(entries);
        self.entries.len() - before
    }

    /// Normalize a batch from either intake path and append it.
    #[instrument(level = "debug", skip(self, batch, registry), fields(files = batch.len()))]
    pub fn intake(
        &mut self,
        source: IntakeSource,
        batch: Vec<RawFile>,
        registry: &PreviewRegistry,
    ) -> usize {
        let added = self.append(normalize(batch, registry));
        debug!(%source, added, total = self.entries.len(), "files staged");
        added
    }

    /// Remove the entry at `index`, releasing its preview first.
    pub fn remove_at(&mut self, index: usize) -> StageResult<StagedFile> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(StageError::IndexOutOfBounds { index, len })?;

        let released = entry.release_preview();
        let removed = self.entries.remove(index);
        debug!(index, name = %removed.name, released, "staged file removed");

        Ok(removed)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StagedFile> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StagedFile> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size_bytes).sum()
    }

    #[must_use]
    pub fn preview_count(&self) -> usize {
        self.entries.iter().filter(|e| e.has_preview()).count()
    }

    /// Drop every entry, releasing all previews. Returns how many previews
    /// were released.
    pub fn clear(&mut self) -> usize {
        let released = self.release_all();
        self.entries.clear();
        released
    }

    /// Discard the store at the end of its screen's life.
    pub fn teardown(mut self) -> usize {
        let files = self.entries.len();
        let released = self.clear();
        info!(files, released, "staging area torn down");
        released
    }

    fn release_all(&mut self) -> usize {
        self.entries
            .iter_mut()
            .map(StagedFile::release_preview)
            .filter(|released| *released)
            .count()
    }
}

impl<'a> IntoIterator for &'a StagedFileStore {
    type Item = &'a StagedFile;
    type IntoIter = std::slice::Iter<'a, StagedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Drop for StagedFileStore {
    fn drop(&mut self) {
        let released = self.release_all();
        if released > 0 {
            debug!(released, "previews released on drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn txt(name: &str, size: u64) -> RawFile {
        RawFile::new(name, size, "text/plain")
    }

    fn png(name: &str, size: u64) -> RawFile {
        RawFile::new(name, size, "image/png")
    }

    #[test]
    fn staging_scenario() {
        let registry = PreviewRegistry::new();
        let mut store = StagedFileStore::new();

        store.intake(IntakeSource::Picker, vec![txt("a.txt", 500)], &registry);
        assert_eq!(size_of(&store.entries[0]), "500 Б");

        store.intake(IntakeSource::Drop, vec![png("b.png", 2048)], &registry);
        let b = store.get(1).map(|e| (e.has_preview(), size_of(e)));
        assert_eq!(b, Some((true, "2.0 КБ".to_string())));

        let removed = store.remove_at(0).map(|e| e.name);
        assert_eq!(removed.as_deref(), Ok("a.txt"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).map(|e| e.name.as_str()), Some("b.png"));
        assert_eq!(registry.live(), 1);
        assert_eq!(registry.released(), 0);
    }

    #[test]
    fn appends_accumulate_in_arrival_order() {
        let registry = PreviewRegistry::new();
        let mut store = StagedFileStore::new();
        let batches = [
            vec![txt("1.txt", 1), png("2.png", 2)],
            vec![],
            vec![txt("3.txt", 3)],
            vec![png("2.png", 2), txt("4.txt", 4), txt("5.txt", 5)],
        ];

        let mut expected = 0;
        for batch in batches {
            expected += batch.len();
            store.intake(IntakeSource::Drop, batch, &registry);
            assert_eq!(store.len(), expected);
        }

        let names: Vec<&str> = store.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["1.txt", "2.png", "3.txt", "2.png", "4.txt", "5.txt"]);
        assert_eq!(store.total_bytes(), 17);
        assert_eq!(store.preview_count(), 2);
    }

    #[test]
    fn out_of_range_removal_leaves_store_untouched() {
        let registry = PreviewRegistry::new();
        let mut store = StagedFileStore::new();
        store.intake(IntakeSource::Picker, vec![png("a.png", 1)], &registry);

        let err = store.remove_at(3).map(|e| e.name);
        assert_eq!(err, Err(StageError::IndexOutOfBounds { index: 3, len: 1 }));
        assert_eq!(store.len(), 1);
        assert_eq!(registry.live(), 1);
    }

    #[test]
    fn successive_removals_never_double_release() {
        let registry = PreviewRegistry::new();
        let mut store = StagedFileStore::new();
        store.intake(
            IntakeSource::Drop,
            vec![png("a.png", 1), png("b.png", 2), txt("c.txt", 3), png("d.png", 4)],
            &registry,
        );
        assert_eq!(registry.allocated(), 3);

        assert!(store.remove_at(1).is_ok());
        assert!(store.remove_at(1).is_ok());
        assert_eq!(registry.released(), 1);
        assert_eq!(registry.live(), 2);

        let released = store.teardown();
        assert_eq!(released, 2);
        assert_eq!(registry.live(), 0);
        assert_eq!(registry.released(), registry.allocated());
    }

    #[test]
    fn dropping_the_store_releases_previews() {
        let registry = PreviewRegistry::new();
        {
            let mut store = StagedFileStore::new();
            store.intake(
                IntakeSource::Drop,
                vec![png("a.png", 1), png("b.png", 2)],
                &registry,
            );
            assert_eq!(registry.live(), 2);
        }

        assert_eq!(registry.live(), 0);
        assert_eq!(registry.released(), 2);
    }

    #[test]
    fn clear_releases_and_empties() {
        let registry = PreviewRegistry::new();
        let mut store = StagedFileStore::new();
        store.intake(IntakeSource::Picker, vec![png("a.png", 1), txt("b.txt", 1)], &registry);

        assert_eq!(store.clear(), 1);
        assert!(store.is_empty());
        assert_eq!(registry.live(), 0);
        assert_eq!(store.clear(), 0);
    }

    /// A file named `<stem>.png` (image) or `<stem>.txt`.
    fn raw_file() -> impl Strategy<Value = RawFile> {
        ("[a-z]{1,8}", 0u64..10_000, any::<bool>()).prop_map(|(stem, size, image)| {
            if image {
                png(&format!("{stem}.png"), size)
            } else {
                txt(&format!("{stem}.txt"), size)
            }
        })
    }

    proptest! {
        #[test]
        fn appended_batches_keep_length_and_order(
            batches in proptest::collection::vec(proptest::collection::vec(raw_file(), 0..5), 0..6),
        ) {
            let registry = PreviewRegistry::new();
            let mut store = StagedFileStore::new();

            let expected: Vec<String> =
                batches.iter().flatten().map(|f| f.name.to_string()).collect();
            let images = batches.iter().flatten().filter(|f| f.is_image()).count();

            for batch in batches {
                let len = batch.len();
                let before = store.len();
                prop_assert_eq!(store.intake(IntakeSource::Drop, batch, &registry), len);
                prop_assert_eq!(store.len(), before + len);
            }

            let names: Vec<String> = store.iter().map(|e| e.name.to_string()).collect();
            prop_assert_eq!(names, expected);
            prop_assert_eq!(store.preview_count(), images);
            prop_assert_eq!(registry.live(), images);

            prop_assert_eq!(store.teardown(), images);
            prop_assert_eq!(registry.live(), 0);
        }

        #[test]
        fn removal_keeps_the_rest_in_order(
            files in proptest::collection::vec(raw_file(), 0..8),
            index in 0usize..10,
        ) {
            let registry = PreviewRegistry::new();
            let mut store = StagedFileStore::new();
            let mut expected: Vec<String> = files.iter().map(|f| f.name.to_string()).collect();
            store.intake(IntakeSource::Picker, files, &registry);

            match store.remove_at(index) {
                Ok(removed) => {
                    prop_assert_eq!(removed.name.to_string(), expected.remove(index));
                    prop_assert!(!removed.has_preview());
                }
                Err(err) => {
                    prop_assert_eq!(err, StageError::IndexOutOfBounds { index, len: expected.len() });
                }
            }

            let names: Vec<String> = store.iter().map(|e| e.name.to_string()).collect();
            prop_assert_eq!(names, expected);
            prop_assert_eq!(registry.live(), store.preview_count());
        }
    }
}
