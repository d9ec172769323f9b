//! Core flatstore: Normalized Entity Indexes
//!
//! This layer holds entity data once and builds ordered views over it:
//! - `Entry`: a readiness-tagged slot, a placeholder until a value lands
//! - `EntryIndex`: key → entry table whose writes are buffered and flushed
//!   on a throttle
//! - `CollectionIndex`: name → ordered key list, resolved live through a
//!   `Resolve` implementation
//! - `EntityStore`: one of each, wired together
//!
//! Reads never fail. A key that was never written reads as a placeholder;
//! a collection that was never set reads as `None`.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use flatstore_core::{to_list, EntityStore, ManualClock, StoreConfig};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct User {
//!     name: String,
//! }
//!
//! let clock = ManualClock::new();
//! let store = EntityStore::with_clock(StoreConfig::default(), clock.clone());
//!
//! // Entities arrive one at a time...
//! store.entries.set("u1", User { name: "Alice".into() });
//! store.entries.set("u2", User { name: "Bob".into() });
//!
//! // ...and are committed together on the next due flush.
//! clock.advance(Duration::from_millis(150));
//! store.run_due();
//!
//! store.collection.set("team", ["u2", "u1"]);
//! let names: Vec<String> = to_list(store.collection.get("team"))
//!     .into_iter()
//!     .map(|user| user.name)
//!     .collect();
//! assert_eq!(names, ["Bob", "Alice"]);
//! ```
//!
//! # Async Support
//!
//! Enable the `async` feature for a tokio task that runs due flushes on its
//! own:
//!
//! ```toml
//! [dependencies]
//! flatstore-core = { version = "0.1", features = ["async"] }
//! ```
//!
//! Then use `spawn_flush_driver`, typically with `TokioClock`.

mod clock;
mod collection;
mod config;
mod entity;
mod entries;
mod entry;
mod error;
mod helper;
mod throttle;
mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::{CollectionIndex, Refs};
pub use config::{StoreConfig, DEFAULT_FLUSH_WINDOW};
pub use entity::{EntityStore, FlatStore, StoreVersion};
pub use entries::{Entries, EntryIndex};
pub use entry::Entry;
pub use error::{Error, Result};
pub use helper::{to_list, with_data};
pub use throttle::Throttle;
pub use traits::Resolve;

// Re-export the watch receiver handed out by `subscribe`
pub use tokio::sync::watch::Receiver as VersionReceiver;

// Async support
#[cfg(feature = "async")]
mod driver;

#[cfg(feature = "async")]
pub use clock::TokioClock;

#[cfg(feature = "async")]
pub use driver::spawn_flush_driver;
