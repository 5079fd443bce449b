//! The working set of uploaded images.
//!
//! An [`UploadCollection`] is an ordered list of [`UploadEntry`] values keyed
//! by filename. Insertion order is display order and export order.
//!
//! - [`UploadCollection::append`] adds entries whose name is not already
//!   present. The first occurrence of a name wins; later duplicates (in the
//!   same batch or a later one) are dropped silently and never move or
//!   overwrite the existing entry.
//! - [`UploadCollection::remove_at`] deletes by position and shifts every
//!   later entry down by one. An out-of-range index is an error: it means
//!   the caller is acting on a stale view.
//!
//! The collection is plain session state. It is created by whoever owns the
//! session and passed explicitly to preview and export.

use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CollectionError {
    #[error("No entry at index {index} (collection has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// One uploaded image: its filename and raw, immutable bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEntry {
    name: String,
    bytes: Arc<[u8]>,
}

impl UploadEntry {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Ordered, name-deduplicated set of pending uploads.
#[derive(Debug, Clone, Default)]
pub struct UploadCollection {
    entries: Vec<UploadEntry>,
    names: HashSet<String>,
}

impl UploadCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append entries in order, skipping any whose name is already present.
    ///
    /// Returns how many entries were actually added.
    pub fn append(&mut self, entries: impl IntoIterator<Item = UploadEntry>) -> usize {
        let mut added = 0;
        for entry in entries {
            if self.names.contains(entry.name()) {
                tracing::debug!(name = %entry.name(), "Skipping duplicate upload");
                continue;
            }
            self.names.insert(entry.name().to_string());
            self.entries.push(entry);
            added += 1;
        }
        added
    }

    /// Remove the entry at `index`, shifting later entries down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<UploadEntry, CollectionError> {
        if index >= self.entries.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.names.remove(removed.name());
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&UploadEntry> {
        self.entries.get(index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UploadEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[UploadEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(UploadEntry::name).collect()
    }
}

impl<'a> IntoIterator for &'a UploadCollection {
    type Item = &'a UploadEntry;
    type IntoIter = std::slice::Iter<'a, UploadEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(name: &str) -> UploadEntry {
        UploadEntry::new(name, name.as_bytes().to_vec())
    }

    fn collection_of(names: &[&str]) -> UploadCollection {
        let mut c = UploadCollection::new();
        c.append(names.iter().map(|n| entry(n)));
        c
    }

    #[test]
    fn duplicate_in_same_batch_keeps_first() {
        let mut c = UploadCollection::new();
        let added = c.append(vec![
            UploadEntry::new("a.png", b"first".to_vec()),
            entry("b.jpg"),
            UploadEntry::new("a.png", b"second".to_vec()),
        ]);
        assert_eq!(added, 2);
        assert_eq!(c.names(), vec!["a.png", "b.jpg"]);
        assert_eq!(c.get(0).unwrap().bytes(), b"first");
    }

    #[test]
    fn duplicate_in_later_batch_is_dropped() {
        let mut c = collection_of(&["a.png", "b.jpg"]);
        let added = c.append(vec![entry("b.jpg"), entry("c.webp")]);
        assert_eq!(added, 1);
        assert_eq!(c.names(), vec!["a.png", "b.jpg", "c.webp"]);
    }

    #[test]
    fn remove_shifts_later_entries() {
        let mut c = collection_of(&["a", "b", "c", "d"]);
        let removed = c.remove_at(1).unwrap();
        assert_eq!(removed.name(), "b");
        assert_eq!(c.names(), vec!["a", "c", "d"]);
    }

    #[test]
    fn removed_name_can_be_added_again_at_the_end() {
        let mut c = collection_of(&["a", "b", "c"]);
        c.remove_at(0).unwrap();
        assert!(!c.contains("a"));
        c.append(vec![entry("a")]);
        assert_eq!(c.names(), vec!["b", "c", "a"]);
    }

    #[test]
    fn remove_out_of_range_leaves_collection_alone() {
        let mut c = collection_of(&["a", "b"]);
        let err = c.remove_at(2).unwrap_err();
        assert_eq!(err, CollectionError::IndexOutOfRange { index: 2, len: 2 });
        assert_eq!(c.names(), vec!["a", "b"]);
    }

    #[test]
    fn remove_from_empty_errors() {
        let mut c = UploadCollection::new();
        assert!(c.remove_at(0).is_err());
        assert!(c.is_empty());
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let c = collection_of(&["z", "a", "m"]);
        let names: Vec<&str> = (&c).into_iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    proptest! {
        #[test]
        fn append_never_yields_duplicate_names(names in prop::collection::vec("[a-d]\\.png", 0..20)) {
            let mut c = UploadCollection::new();
            c.append(names.iter().map(|n| entry(n)));
            let mut seen = HashSet::new();
            for name in c.names() {
                prop_assert!(seen.insert(name));
            }
            // first-seen order
            let mut expected: Vec<&str> = Vec::new();
            for n in &names {
                if !expected.contains(&n.as_str()) {
                    expected.push(n);
                }
            }
            prop_assert_eq!(c.names(), expected);
        }

        #[test]
        fn remove_at_shifts_by_exactly_one(len in 1usize..12, pick in 0usize..12) {
            let names: Vec<String> = (0..len).map(|i| format!("{i}.png")).collect();
            let mut c = UploadCollection::new();
            c.append(names.iter().map(|n| entry(n)));
            let before: Vec<String> = c.names().iter().map(|s| s.to_string()).collect();

            match c.remove_at(pick) {
                Ok(_) => {
                    prop_assert!(pick < len);
                    prop_assert_eq!(c.len(), len - 1);
                    for i in 0..c.len() {
                        let expected = if i < pick { &before[i] } else { &before[i + 1] };
                        prop_assert_eq!(c.get(i).unwrap().name(), expected.as_str());
                    }
                }
                Err(_) => {
                    prop_assert!(pick >= len);
                    prop_assert_eq!(c.names(), before.iter().map(String::as_str).collect::<Vec<_>>());
                }
            }
        }
    }
}
