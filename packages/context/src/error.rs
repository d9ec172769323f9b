//! Error types for store contexts.

use thiserror::Error;

/// Errors raised when a store context is used incorrectly.
///
/// None of these are data conditions: each one means the surrounding program
/// was wired up wrong, so they are not worth retrying.
#[derive(Debug, Error)]
pub enum ContextError {
    /// `use_store` was called while no provider boundary was open.
    #[error("use_store without StoreContext: no provider is mounted for this context")]
    NoProvider,

    /// A `StoreMap` has no store under the requested name.
    #[error("no store named '{name}'")]
    UnknownStore { name: String },

    /// A `StoreMap` store exists but holds a different entity type.
    #[error("store '{name}' holds {found}, not {expected}")]
    StoreTypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Result type alias for context operations.
pub type Result<T> = std::result::Result<T, ContextError>;
