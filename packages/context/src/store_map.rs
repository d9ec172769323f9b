//! Named stores of mixed entity types.

use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt;

use flatstore_core::EntityStore;

use crate::error::{ContextError, Result};

/// Type-erased entity store.
trait ErasedStore: Send + Sync {
    fn run_due(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    /// Name of the entity type the store holds.
    fn entity_type(&self) -> &'static str;
}

impl<T: Send + Sync + 'static> ErasedStore for EntityStore<T> {
    fn run_due(&self) -> bool {
        EntityStore::run_due(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn entity_type(&self) -> &'static str {
        type_name::<T>()
    }
}

/// A mapping from store name to entity store.
///
/// Each store may hold a different entity type; [`StoreMap::get`] checks the
/// type on the way out.
///
/// # Example
///
/// ```rust
/// use flatstore_context::StoreMap;
/// use flatstore_core::EntityStore;
///
/// let stores = StoreMap::new()
///     .with("users", EntityStore::<String>::new())
///     .with("scores", EntityStore::<u32>::new());
///
/// let users = stores.get::<String>("users").unwrap();
/// assert!(users.collection.get("admins").is_none());
///
/// assert!(stores.get::<u32>("users").is_err());
/// assert!(stores.get::<u32>("missing").is_err());
/// ```
#[derive(Default)]
pub struct StoreMap {
    stores: BTreeMap<String, Box<dyn ErasedStore>>,
}

impl StoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a store under `name`, replacing any store already there.
    pub fn insert<T>(&mut self, name: impl Into<String>, store: EntityStore<T>)
    where
        T: Send + Sync + 'static,
    {
        self.stores.insert(name.into(), Box::new(store));
    }

    /// Builder form of [`StoreMap::insert`].
    pub fn with<T>(mut self, name: impl Into<String>, store: EntityStore<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.insert(name, store);
        self
    }

    /// Get a handle to the store named `name` holding entities of type `T`.
    pub fn get<T>(&self, name: &str) -> Result<EntityStore<T>>
    where
        T: Send + Sync + 'static,
    {
        let store = self
            .stores
            .get(name)
            .ok_or_else(|| ContextError::UnknownStore {
                name: name.to_string(),
            })?;

        store
            .as_any()
            .downcast_ref::<EntityStore<T>>()
            .cloned()
            .ok_or_else(|| ContextError::StoreTypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
                found: store.entity_type(),
            })
    }

    /// Remove the store named `name`. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.stores.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }

    /// Store names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Run every due flush. Returns how many stores committed writes.
    pub fn run_due(&self) -> usize {
        self.stores
            .values()
            .filter(|store| store.run_due())
            .count()
    }
}

impl fmt::Debug for StoreMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.stores
                    .iter()
                    .map(|(name, store)| (name, store.entity_type())),
            )
            .finish()
    }
}
