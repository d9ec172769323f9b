//! Scoped distribution of stores.
//!
//! A `StoreContext` owns an initializer. Opening a [`Provider`] runs the
//! initializer once and publishes the result to every consumer holding the
//! context; dropping the provider takes it away again.
//!
//! ```text
//!   StoreContext ──provide()──▶ Provider ──(drop)──▶ torn down
//!        │                         │
//!   use_store() ◀── same Arc<S> ───┘
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{ContextError, Result};

/// A scoped registry of stores of type `S`.
///
/// `S` is usually a struct with one field per named store, or a
/// [`StoreMap`](crate::StoreMap) when the set of stores is only known at
/// runtime. The context is shared as `Arc<StoreContext<S>>` and handed to
/// consumers explicitly.
///
/// # Example
///
/// ```rust
/// use flatstore_context::StoreContext;
/// use flatstore_core::EntityStore;
///
/// struct Stores {
///     users: EntityStore<String>,
/// }
///
/// let context = StoreContext::new(|| Stores { users: EntityStore::new() });
/// assert!(context.use_store().is_err());
///
/// let provider = context.provide();
/// let stores = context.use_store().unwrap();
/// assert!(stores.users.entries.get("nobody").is_placeholder());
///
/// drop(provider);
/// assert!(context.use_store().is_err());
/// ```
pub struct StoreContext<S> {
    init: Box<dyn Fn() -> S + Send + Sync>,
    /// Live boundaries, innermost last.
    providers: Mutex<Vec<Arc<S>>>,
}

/// Create a store context from an initializer.
pub fn create_store_context<S, F>(init: F) -> Arc<StoreContext<S>>
where
    F: Fn() -> S + Send + Sync + 'static,
{
    StoreContext::new(init)
}

impl<S> StoreContext<S> {
    pub fn new<F>(init: F) -> Arc<Self>
    where
        F: Fn() -> S + Send + Sync + 'static,
    {
        Arc::new(Self {
            init: Box::new(init),
            providers: Mutex::new(Vec::new()),
        })
    }

    /// Open a distribution boundary.
    ///
    /// Runs the initializer exactly once for this boundary. Until the
    /// returned provider is dropped, `use_store` yields the stores it
    /// created. Boundaries nest: the innermost open one wins.
    pub fn provide(self: &Arc<Self>) -> Provider<S> {
        // The initializer may itself read an outer boundary.
        let stores = Arc::new((self.init)());

        let mut providers = self.providers.lock();
        providers.push(Arc::clone(&stores));
        tracing::debug!(depth = providers.len(), "opened store context boundary");
        drop(providers);

        Provider {
            context: Arc::clone(self),
            stores,
        }
    }

    /// The stores of the innermost open boundary.
    ///
    /// Every caller inside the same boundary receives the same instance.
    /// Fails with [`ContextError::NoProvider`] when no boundary is open.
    pub fn use_store(&self) -> Result<Arc<S>> {
        self.providers
            .lock()
            .last()
            .cloned()
            .ok_or(ContextError::NoProvider)
    }

    /// Run `f` inside a fresh boundary, tearing it down afterwards.
    pub fn scope<R>(self: &Arc<Self>, f: impl FnOnce(&Arc<S>) -> R) -> R {
        let provider = self.provide();
        f(provider.stores())
    }

    pub fn is_provided(&self) -> bool {
        !self.providers.lock().is_empty()
    }

    /// Number of open boundaries.
    pub fn depth(&self) -> usize {
        self.providers.lock().len()
    }
}

impl<S> fmt::Debug for StoreContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreContext")
            .field("depth", &self.depth())
            .finish()
    }
}

/// An open distribution boundary. Dropping it tears the boundary down.
#[must_use = "the boundary closes as soon as the provider is dropped"]
pub struct Provider<S> {
    context: Arc<StoreContext<S>>,
    stores: Arc<S>,
}

impl<S> Provider<S> {
    /// The stores published by this boundary.
    pub fn stores(&self) -> &Arc<S> {
        &self.stores
    }

    pub fn context(&self) -> &Arc<StoreContext<S>> {
        &self.context
    }
}

impl<S> std::ops::Deref for Provider<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.stores
    }
}

impl<S> Drop for Provider<S> {
    fn drop(&mut self) {
        let mut providers = self.context.providers.lock();
        // Boundaries normally close innermost first, but a provider may be
        // dropped out of order.
        if let Some(position) = providers
            .iter()
            .rposition(|stores| Arc::ptr_eq(stores, &self.stores))
        {
            providers.remove(position);
        }
        tracing::debug!(depth = providers.len(), "closed store context boundary");
    }
}

impl<S> fmt::Debug for Provider<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider").finish_non_exhaustive()
    }
}
