//! Store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default coalescing window for buffered entry writes.
pub const DEFAULT_FLUSH_WINDOW: Duration = Duration::from_millis(150);

/// Configuration for an entity store.
///
/// Parsed from JSON like `{"flush_window_ms": 150}`. Missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// How long buffered `set` calls are coalesced before a trailing flush.
    #[serde(rename = "flush_window_ms", with = "millis")]
    pub flush_window: Duration,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flush_window(mut self, window: Duration) -> Self {
        self.flush_window = window;
        self
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            flush_window: DEFAULT_FLUSH_WINDOW,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
