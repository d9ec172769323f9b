//! The entry index: a write-coalescing key/value table.
//!
//! Writes go into a pending buffer and are committed in one batch when the
//! flush throttle says so. Reads only ever see committed state.
//!
//! ```text
//!  set(k, v) ──▶ pending ──(throttle due, host turn: run_due)──▶ committed ──▶ get(k)
//!                   ▲                                               │
//!  delete(k) ───────┴───────────── removes from both ───────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::sync::{watch, Notify};

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::throttle::Throttle;
use crate::{Entry, Resolve};

/// Committed entries, keyed by entry key.
pub type Entries<T> = HashMap<String, Arc<Entry<T>>>;

/// A handle to an entry index.
///
/// Cloning the handle is cheap and every clone refers to the same index.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use flatstore_core::{EntryIndex, ManualClock, StoreConfig};
///
/// let clock = ManualClock::new();
/// let entries = EntryIndex::with_clock(StoreConfig::default(), clock.clone());
///
/// entries.set("a", "Alice");
/// assert!(!entries.get("a").is_ready());
///
/// clock.advance(Duration::from_millis(150));
/// entries.run_due();
/// assert_eq!(entries.get("a").data(), Some(&"Alice"));
/// ```
pub struct EntryIndex<T> {
    inner: Arc<Shared<T>>,
}

struct Shared<T> {
    state: RwLock<EntriesState<T>>,
    /// Returned for every miss so repeated misses are `Arc::ptr_eq`.
    placeholder: Arc<Entry<T>>,
    clock: Arc<dyn Clock>,
    armed: Notify,
    version_tx: watch::Sender<u64>,
}

struct EntriesState<T> {
    committed: Arc<Entries<T>>,
    pending: HashMap<String, Entry<T>>,
    throttle: Throttle,
    version: u64,
}

impl<T> EntriesState<T> {
    /// Merge the pending buffer into the committed map.
    ///
    /// Returns the new version if anything was committed.
    fn flush(&mut self) -> Option<u64> {
        if self.pending.is_empty() {
            return None;
        }

        let count = self.pending.len();
        let committed = Arc::make_mut(&mut self.committed);
        committed.extend(
            self.pending
                .drain()
                .map(|(key, entry)| (key, Arc::new(entry))),
        );
        self.version += 1;

        tracing::debug!(count, version = self.version, "flushed buffered entries");
        Some(self.version)
    }
}

impl<T> EntryIndex<T> {
    /// Create an empty index with the default configuration and wall-clock time.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Create an empty index whose flush deadlines are measured on `clock`.
    pub fn with_clock(config: StoreConfig, clock: impl Clock + 'static) -> Self {
        let (version_tx, _) = watch::channel(0);
        Self {
            inner: Arc::new(Shared {
                state: RwLock::new(EntriesState {
                    committed: Arc::new(HashMap::new()),
                    pending: HashMap::new(),
                    throttle: Throttle::new(config.flush_window),
                    version: 0,
                }),
                placeholder: Arc::new(Entry::placeholder()),
                clock: Arc::new(clock),
                armed: Notify::new(),
                version_tx,
            }),
        }
    }

    /// Get the committed entry for `key`.
    ///
    /// Unknown keys yield the index's shared placeholder. Pending writes are
    /// never visible here.
    pub fn get(&self, key: &str) -> Arc<Entry<T>> {
        self.inner
            .state
            .read()
            .committed
            .get(key)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.inner.placeholder))
    }

    /// Buffer a write of `data` under `key` and arm the flush.
    ///
    /// Writing the same key again before the flush replaces the buffered
    /// value.
    pub fn set(&self, key: impl Into<String>, data: T) {
        let key = key.into();
        let now = self.inner.clock.now();

        let mut state = self.inner.state.write();
        let was_armed = state.throttle.is_armed();
        let deadline = state.throttle.call(now);
        let replaced = state.pending.insert(key.clone(), Entry::ready(data)).is_some();
        let pending = state.pending.len();
        drop(state);
        tracing::trace!(key = %key, replaced, pending, "buffered entry write");

        if !was_armed {
            tracing::trace!(
                delay_ms = deadline.saturating_duration_since(now).as_millis() as u64,
                "armed entry flush"
            );
            self.inner.armed.notify_one();
        }
    }

    /// Remove `key` from the index immediately.
    ///
    /// Any write for `key` still waiting in the buffer is discarded as well,
    /// so a later flush cannot bring the key back. Deleting an unknown key
    /// does nothing.
    pub fn delete(&self, key: &str) {
        let mut state = self.inner.state.write();

        if state.pending.remove(key).is_some() {
            tracing::trace!(key, "discarded buffered entry write");
        }

        if !state.committed.contains_key(key) {
            return;
        }
        Arc::make_mut(&mut state.committed).remove(key);
        state.version += 1;
        let version = state.version;
        drop(state);

        tracing::debug!(key, version, "deleted entry");
        self.inner.version_tx.send_replace(version);
    }

    /// Run the buffered flush if its deadline has passed.
    ///
    /// This is one turn of the host loop. Returns `true` if the flush
    /// committed anything. A due flush whose writes were all discarded by
    /// `delete` still consumes the deadline but returns `false`.
    pub fn run_due(&self) -> bool {
        let now = self.inner.clock.now();

        let mut state = self.inner.state.write();
        if !state.throttle.take_due(now) {
            return false;
        }
        let committed = state.flush();
        drop(state);

        match committed {
            Some(version) => {
                self.inner.version_tx.send_replace(version);
                true
            }
            None => false,
        }
    }

    /// When the armed flush becomes due, if one is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner.state.read().throttle.deadline()
    }

    /// How long until the armed flush is due, measured on the index's clock.
    ///
    /// Zero once the deadline has passed.
    #[cfg_attr(not(feature = "async"), allow(dead_code))]
    pub(crate) fn until_due(&self) -> Option<Duration> {
        let deadline = self.next_deadline()?;
        Some(deadline.saturating_duration_since(self.inner.clock.now()))
    }

    /// The coalescing window of this index.
    pub fn flush_window(&self) -> Duration {
        self.inner.state.read().throttle.window()
    }

    /// A consistent view of every committed entry.
    ///
    /// Later flushes and deletes never modify a snapshot already taken.
    pub fn snapshot(&self) -> Arc<Entries<T>> {
        Arc::clone(&self.inner.state.read().committed)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.state.read().committed.contains_key(key)
    }

    /// Number of committed entries.
    pub fn len(&self) -> usize {
        self.inner.state.read().committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of writes waiting for the next flush.
    pub fn pending_len(&self) -> usize {
        self.inner.state.read().pending.len()
    }

    /// Monotonic counter bumped on every committed change.
    pub fn version(&self) -> u64 {
        self.inner.state.read().version
    }

    /// Watch the version counter.
    ///
    /// The receiver is marked changed after every flush or delete that
    /// altered committed state.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.version_tx.subscribe()
    }

    /// Signalled when a write arms a flush on an idle index.
    #[cfg_attr(not(feature = "async"), allow(dead_code))]
    pub(crate) fn armed(&self) -> &Notify {
        &self.inner.armed
    }

    /// Whether two handles refer to the same index.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for EntryIndex<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for EntryIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EntryIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("EntryIndex")
            .field("len", &state.committed.len())
            .field("pending", &state.pending.len())
            .field("version", &state.version)
            .finish()
    }
}

impl<T: Send + Sync> Resolve<T> for EntryIndex<T> {
    fn resolve(&self, key: &str) -> Arc<Entry<T>> {
        self.get(key)
    }
}
