//! Store contexts for flatstore.
//!
//! A [`StoreContext`] hands one set of stores to every consumer inside a
//! [`Provider`] boundary. The context is an ordinary value: create it once,
//! pass `Arc<StoreContext<S>>` to whoever needs it, and open a provider for
//! the span of the program in which the stores should live.
//!
//! Asking for the stores outside any boundary is a wiring bug and fails with
//! [`ContextError::NoProvider`].
//!
//! # Example
//!
//! ```rust
//! use flatstore_context::{create_store_context, StoreMap};
//! use flatstore_core::EntityStore;
//!
//! let context = create_store_context(|| {
//!     StoreMap::new()
//!         .with("users", EntityStore::<String>::new())
//!         .with("posts", EntityStore::<String>::new())
//! });
//!
//! let _provider = context.provide();
//! let users = context.use_store().unwrap().get::<String>("users").unwrap();
//! users.collection.set("admins", ["u1"]);
//! ```

mod context;
mod error;
mod store_map;

pub use context::{create_store_context, Provider, StoreContext};
pub use error::{ContextError, Result};
pub use store_map::StoreMap;
