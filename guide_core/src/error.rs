//! Engine error types.
//!
//! None of these escape an [`AssistantSession`](crate::AssistantSession):
//! storage failures degrade to defaults and fetch failures become the
//! session's `Error` state.

use thiserror::Error;

/// Failures of the persisted key-value capability.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures of the content-fetch capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("content fetch failed: {0}")]
    Failed(String),
    #[error("content fetch returned no locator")]
    EmptyLocator,
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
