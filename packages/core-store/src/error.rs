//! Error types for the core layer.

use thiserror::Error;

/// Errors at the core layer.
///
/// Index operations themselves are infallible: unknown keys and unknown
/// collections are represented by placeholders and `None`. Only loading
/// configuration can fail.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn config_error_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: Error = json_err.into();
        assert!(format!("{}", e).contains("config error"));
    }

    #[test]
    fn config_error_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let e = Error::Config(json_err);
        assert!(StdError::source(&e).is_some());
    }
}
