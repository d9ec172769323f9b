//! flatstore: a normalized in-memory entity store.
//!
//! Entities are stored once, by key, in an [`EntryIndex`] whose writes are
//! buffered and committed in throttled batches. Ordered views over those
//! entities live in a [`CollectionIndex`] that stores keys only and resolves
//! them on every read. An [`EntityStore`] wires the two together, and a
//! [`StoreContext`] distributes stores to the consumers inside a
//! [`Provider`] boundary.
//!
//! The layers are published as separate crates:
//! - `flatstore-core`: entries, collections, entity stores, throttle, clocks
//! - `flatstore-context`: store contexts and named store maps

pub use flatstore_context::{create_store_context, ContextError, Provider, StoreContext, StoreMap};
pub use flatstore_core::{
    to_list, with_data, Clock, CollectionIndex, Entries, Entry, EntityStore, EntryIndex, Error,
    FlatStore, ManualClock, Refs, Resolve, Result, StoreConfig, StoreVersion, SystemClock,
    Throttle, VersionReceiver, DEFAULT_FLUSH_WINDOW,
};

#[cfg(feature = "async")]
pub use flatstore_core::{spawn_flush_driver, TokioClock};
