//! Core traits: Resolve.

use std::sync::Arc;

use crate::Entry;

/// Look up the current entry for a key.
///
/// This is the seam between the collection index and the entry index: a
/// collection stores only keys and asks its resolver for the entry behind
/// each key on every read.
///
/// Implementations must not fail. Unknown keys resolve to a placeholder.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Arc<dyn Resolve<T>>`.
pub trait Resolve<T>: Send + Sync {
    fn resolve(&self, key: &str) -> Arc<Entry<T>>;
}

impl<T, F> Resolve<T> for F
where
    F: Fn(&str) -> Arc<Entry<T>> + Send + Sync,
{
    fn resolve(&self, key: &str) -> Arc<Entry<T>> {
        self(key)
    }
}
