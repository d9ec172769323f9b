//! Entity stores: one entry index wired to one collection index.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::{CollectionIndex, EntryIndex};

/// An entry index plus a collection index that resolves through it.
///
/// Both fields are handles; cloning the store is cheap and every clone
/// shares the same data. There is exactly one source of entity data per
/// store: reading `entries` directly and reading through `collection` always
/// agree.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use flatstore_core::{EntityStore, ManualClock, StoreConfig};
///
/// let clock = ManualClock::new();
/// let store = EntityStore::with_clock(StoreConfig::default(), clock.clone());
///
/// store.entries.set("a", 1);
/// store.entries.set("b", 2);
/// clock.advance(Duration::from_millis(150));
/// store.run_due();
///
/// store.collection.set("list", ["a", "b"]);
/// let list = store.collection.get("list").unwrap();
/// assert_eq!(list[1].data(), Some(&2));
/// ```
pub struct EntityStore<T> {
    pub entries: EntryIndex<T>,
    pub collection: CollectionIndex<T>,
}

/// Alias kept for code written against the flat-store naming.
pub type FlatStore<T> = EntityStore<T>;

/// Versions of both indexes of a store.
///
/// Compare two values to learn whether anything observable changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StoreVersion {
    pub entries: u64,
    pub collection: u64,
}

impl<T: Send + Sync + 'static> EntityStore<T> {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock(config: StoreConfig, clock: impl Clock + 'static) -> Self {
        Self::from_entries(EntryIndex::with_clock(config, clock))
    }

    /// Build a store around an existing entry index.
    pub fn from_entries(entries: EntryIndex<T>) -> Self {
        let collection = CollectionIndex::with_resolver(Arc::new(entries.clone()));
        Self {
            entries,
            collection,
        }
    }
}

impl<T> EntityStore<T> {
    /// Run the entry index's buffered flush if it is due. Returns `true` if
    /// it committed anything.
    pub fn run_due(&self) -> bool {
        self.entries.run_due()
    }

    pub fn version(&self) -> StoreVersion {
        StoreVersion {
            entries: self.entries.version(),
            collection: self.collection.version(),
        }
    }
}

impl<T> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            collection: self.collection.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("entries", &self.entries)
            .field("collection", &self.collection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::{Entry, ManualClock};

    #[derive(Debug, Clone, PartialEq)]
    struct Shape {
        id: String,
    }

    fn store() -> (EntityStore<Shape>, ManualClock) {
        let clock = ManualClock::new();
        (
            EntityStore::with_clock(StoreConfig::default(), clock.clone()),
            clock,
        )
    }

    #[test]
    fn combines_entries_and_collection() {
        let (store, clock) = store();
        let a = Shape { id: "A".into() };
        let b = Shape { id: "B".into() };

        store.entries.set("a", a.clone());
        store.entries.set("b", b.clone());
        clock.advance(Duration::from_millis(150));
        store.run_due();

        store.collection.set("my-list", ["a", "b"]);

        let list = store.collection.get("my-list").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(*list[0], Entry::ready(a));
        assert_eq!(*list[1], Entry::ready(b));
    }

    #[test]
    fn collection_reflects_later_entry_updates() {
        let (store, clock) = store();
        store.collection.set("list", ["a"]);

        let list = store.collection.get("list").unwrap();
        assert!(list[0].is_placeholder());

        store.entries.set("a", Shape { id: "A".into() });
        clock.advance(Duration::from_millis(150));
        store.run_due();

        let list = store.collection.get("list").unwrap();
        assert_eq!(list[0].data().map(|s| s.id.as_str()), Some("A"));

        store.entries.delete("a");
        assert!(store.collection.get("list").unwrap()[0].is_placeholder());
    }

    #[test]
    fn collection_misses_share_the_entries_placeholder() {
        let (store, _) = store();
        store.collection.set("list", ["x", "y"]);
        let list = store.collection.get("list").unwrap();
        assert!(Arc::ptr_eq(&list[0], &store.entries.get("z")));
        assert!(Arc::ptr_eq(&list[0], &list[1]));
    }

    #[test]
    fn version_tracks_both_indexes() {
        let (store, clock) = store();
        let initial = store.version();
        assert_eq!(initial, StoreVersion::default());

        store.entries.set("a", Shape { id: "A".into() });
        assert_eq!(store.version(), initial);

        clock.advance(Duration::from_millis(150));
        store.run_due();
        store.collection.set("list", ["a"]);
        assert_eq!(
            store.version(),
            StoreVersion {
                entries: 1,
                collection: 1
            }
        );
    }

    #[test]
    fn clones_share_indexes() {
        let (store, _) = store();
        let other = store.clone();
        assert!(store.entries.ptr_eq(&other.entries));

        other.collection.set("list", ["a"]);
        assert!(store.collection.contains("list"));
    }

    #[test]
    fn flat_store_alias() {
        let store: FlatStore<u32> = FlatStore::new();
        assert!(store.collection.get("none").is_none());
        assert!(store.entries.get("none").is_placeholder());
    }
}
