//! The Entry type - a readiness-tagged slot for one entity.

use serde::{Deserialize, Serialize};

/// A readiness-tagged slot holding one unit of data.
///
/// An entry is either a placeholder (`ready == false`, no data), which is
/// what every lookup of an unknown key yields, or a committed value
/// (`ready == true`, data present).
///
/// # Serialization
///
/// Entries serialize as `{"ready": bool, "data": T | null}`. The `ready`
/// field is optional on input; use [`Entry::is_ready`] rather than reading
/// the field directly so that payloads without the flag still count as ready
/// when they carry data.
///
/// ```rust
/// use flatstore_core::Entry;
///
/// let entry: Entry<u32> = serde_json::from_str(r#"{"data": 7}"#).unwrap();
/// assert!(entry.is_ready());
/// assert_eq!(entry.data(), Some(&7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry<T> {
    /// Whether a value has been committed for this key.
    #[serde(default)]
    pub ready: bool,

    /// The committed value, or `None` for a placeholder.
    pub data: Option<T>,
}

impl<T> Entry<T> {
    /// The placeholder for a key that was never written.
    pub const fn placeholder() -> Self {
        Self {
            ready: false,
            data: None,
        }
    }

    /// A committed entry holding `data`.
    pub fn ready(data: T) -> Self {
        Self {
            ready: true,
            data: Some(data),
        }
    }

    /// Whether this entry carries a committed value.
    pub fn is_ready(&self) -> bool {
        self.ready || self.data.is_some()
    }

    /// Whether this entry is a placeholder.
    pub fn is_placeholder(&self) -> bool {
        !self.is_ready()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl<T> From<T> for Entry<T> {
    fn from(data: T) -> Self {
        Self::ready(data)
    }
}
