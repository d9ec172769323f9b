//! The collection index: named, ordered lists of entry keys.
//!
//! A collection holds keys only. Every `get` resolves those keys through the
//! injected [`Resolve`] implementation, so the result always reflects the
//! entries as they are now, not as they were when the list was set.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::{Entry, Resolve};

/// A handle to a collection index.
///
/// Cloning the handle is cheap and every clone refers to the same index.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use flatstore_core::{CollectionIndex, Entry};
///
/// let collection: CollectionIndex<String> =
///     CollectionIndex::new(|key: &str| Arc::new(Entry::ready(key.to_uppercase())));
///
/// assert!(collection.get("letters").is_none());
///
/// collection.set("letters", ["a", "b"]);
/// let resolved = collection.get("letters").unwrap();
/// assert_eq!(resolved[0].data(), Some(&"A".to_string()));
/// assert_eq!(resolved[1].data(), Some(&"B".to_string()));
/// ```
pub struct CollectionIndex<T> {
    inner: Arc<Shared>,
    resolver: Arc<dyn Resolve<T>>,
}

struct Shared {
    state: RwLock<CollectionState>,
    version_tx: watch::Sender<u64>,
}

struct CollectionState {
    lists: HashMap<String, Arc<[String]>>,
    version: u64,
}

impl<T> CollectionIndex<T> {
    /// Create an empty collection index resolving keys through `resolver`.
    pub fn new(resolver: impl Resolve<T> + 'static) -> Self {
        Self::with_resolver(Arc::new(resolver))
    }

    pub fn with_resolver(resolver: Arc<dyn Resolve<T>>) -> Self {
        let (version_tx, _) = watch::channel(0);
        Self {
            inner: Arc::new(Shared {
                state: RwLock::new(CollectionState {
                    lists: HashMap::new(),
                    version: 0,
                }),
                version_tx,
            }),
            resolver,
        }
    }

    /// Resolve the collection `name`.
    ///
    /// Returns `None` if `name` was never set (or was deleted). An empty
    /// list yields `Some(vec![])`. Order and duplicates are preserved.
    pub fn get(&self, name: &str) -> Option<Vec<Arc<Entry<T>>>> {
        // Resolve outside the lock; the resolver may take other locks.
        let keys = self.inner.state.read().lists.get(name).cloned()?;
        Some(keys.iter().map(|key| self.resolver.resolve(key)).collect())
    }

    /// Replace the key list of collection `name`.
    pub fn set<I, K>(&self, name: impl Into<String>, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let name = name.into();
        let keys: Arc<[String]> = keys.into_iter().map(Into::into).collect();

        let mut state = self.inner.state.write();
        tracing::trace!(collection = %name, len = keys.len(), "set collection");
        state.lists.insert(name, keys);
        state.version += 1;
        let version = state.version;
        drop(state);

        self.inner.version_tx.send_replace(version);
    }

    /// Remove collection `name`. Removing an unknown collection does nothing.
    pub fn delete(&self, name: &str) {
        let mut state = self.inner.state.write();
        if state.lists.remove(name).is_none() {
            return;
        }
        state.version += 1;
        let version = state.version;
        drop(state);

        tracing::debug!(collection = name, version, "deleted collection");
        self.inner.version_tx.send_replace(version);
    }

    /// The stored keys of collection `name`, unresolved.
    pub fn keys(&self, name: &str) -> Option<Vec<String>> {
        self.inner
            .state
            .read()
            .lists
            .get(name)
            .map(|keys| keys.to_vec())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.state.read().lists.contains_key(name)
    }

    /// Names of all collections, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.inner.state.read().lists.keys().cloned().collect()
    }

    /// Monotonic counter bumped on every set or effective delete.
    pub fn version(&self) -> u64 {
        self.inner.state.read().version
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version_tx.subscribe()
    }

    /// A handle bound to a single collection name.
    pub fn refs(&self, namespace: impl Into<String>) -> Refs<T> {
        Refs {
            collection: self.clone(),
            namespace: namespace.into(),
        }
    }
}

impl<T> Clone for CollectionIndex<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl<T> fmt::Debug for CollectionIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("CollectionIndex")
            .field("collections", &state.lists.len())
            .field("version", &state.version)
            .finish()
    }
}

/// A collection handle fixed to one name.
///
/// Useful for code that owns exactly one list, e.g. "the current search
/// results", and should not need to know its name.
pub struct Refs<T> {
    collection: CollectionIndex<T>,
    namespace: String,
}

impl<T> Refs<T> {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Resolve the bound collection. See [`CollectionIndex::get`].
    pub fn get(&self) -> Option<Vec<Arc<Entry<T>>>> {
        self.collection.get(&self.namespace)
    }

    /// Replace the bound collection's key list.
    pub fn set<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.collection.set(self.namespace.clone(), keys);
    }
}

impl<T> Clone for Refs<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

impl<T> fmt::Debug for Refs<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refs")
            .field("namespace", &self.namespace)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Shape {
        id: String,
    }

    /// A resolver that records every key it is asked for.
    fn spy() -> (CollectionIndex<Shape>, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let collection = CollectionIndex::new(move |key: &str| {
            recorded.lock().push(key.to_string());
            Arc::new(Entry::ready(Shape {
                id: "foo".to_string(),
            }))
        });
        (collection, calls)
    }

    #[test]
    fn unset_collection_is_none() {
        let (collection, calls) = spy();
        assert!(collection.get("unset").is_none());
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn resolves_each_key_in_order() {
        let (collection, calls) = spy();

        collection.set("my-key", ["a", "b", "c", "d"]);

        let result = collection.get("my-key").unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(*calls.lock(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_list_is_not_none() {
        let (collection, _) = spy();
        collection.set("empty", Vec::<String>::new());
        assert_eq!(collection.get("empty").map(|list| list.len()), Some(0));
    }

    #[test]
    fn duplicates_are_preserved() {
        let (collection, calls) = spy();
        collection.set("dups", ["a", "a", "b"]);
        assert_eq!(collection.get("dups").unwrap().len(), 3);
        assert_eq!(*calls.lock(), vec!["a", "a", "b"]);
    }

    #[test]
    fn get_resolves_on_every_call() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        let collection: CollectionIndex<usize> = CollectionIndex::new(move |_: &str| {
            Arc::new(Entry::ready(seen.fetch_add(1, Ordering::SeqCst)))
        });

        collection.set("list", ["x"]);
        let first = collection.get("list").unwrap();
        let second = collection.get("list").unwrap();
        assert_eq!(first[0].data(), Some(&0));
        assert_eq!(second[0].data(), Some(&1));
    }

    #[test]
    fn set_replaces_keys() {
        let (collection, _) = spy();
        collection.set("list", ["a", "b"]);
        collection.set("list", ["c"]);
        assert_eq!(collection.keys("list"), Some(vec!["c".to_string()]));
    }

    #[test]
    fn delete_removes_collection() {
        let (collection, _) = spy();
        collection.set("list", ["a"]);
        assert!(collection.contains("list"));

        collection.delete("list");
        assert!(collection.get("list").is_none());
        assert!(!collection.contains("list"));
    }

    #[test]
    fn version_counts_changes() {
        let (collection, _) = spy();
        let mut rx = collection.subscribe();

        collection.set("a", ["x"]);
        collection.set("b", ["y"]);
        collection.delete("missing");
        assert_eq!(collection.version(), 2);

        collection.delete("a");
        assert_eq!(collection.version(), 3);
        assert_eq!(*rx.borrow_and_update(), 3);
    }

    #[test]
    fn names_lists_all_collections() {
        let (collection, _) = spy();
        collection.set("a", ["x"]);
        collection.set("b", ["y"]);

        let mut names = collection.names();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn refs_are_bound_to_one_name() {
        let (collection, _) = spy();
        let refs = collection.refs("results");
        assert_eq!(refs.namespace(), "results");
        assert!(refs.get().is_none());

        refs.set(["a", "b"]);
        assert_eq!(refs.get().unwrap().len(), 2);
        assert_eq!(
            collection.keys("results"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }
}
