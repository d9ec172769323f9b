//! Helpers for consuming resolved collections.

use std::sync::Arc;

use crate::Entry;

/// Whether `entry` carries data.
pub fn with_data<T>(entry: &Entry<T>) -> bool {
    entry.data.is_some()
}

/// Collect the data of every loaded entry, skipping placeholders.
///
/// An unset collection (`None`) yields an empty list.
///
/// ```rust
/// use std::sync::Arc;
/// use flatstore_core::{to_list, Entry};
///
/// let resolved = Some(vec![
///     Arc::new(Entry::ready(1)),
///     Arc::new(Entry::placeholder()),
///     Arc::new(Entry::ready(3)),
/// ]);
/// assert_eq!(to_list(resolved), vec![1, 3]);
/// assert!(to_list::<u8>(None).is_empty());
/// ```
pub fn to_list<T: Clone>(entries: Option<Vec<Arc<Entry<T>>>>) -> Vec<T> {
    entries
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| entry.data.clone())
        .collect()
}
