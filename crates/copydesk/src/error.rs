//! Unified error type for the copydesk library.
//!
//! Store operations swallow these errors at their public boundary (see the
//! crate-level failure model); the type exists so that the internal
//! read-modify-write steps can propagate with `?` and so that setup code
//! such as backend construction and config loading can report failures.

use thiserror::Error;

use crate::backend::StorageError;
use crate::config::ConfigError;

/// Unified error type for all copydesk operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the storage backend.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A stored blob could not be parsed.
    #[error("Corrupt data under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized for storage.
    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this error came from the storage backend.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns `true` if this error is a corrupt stored blob.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }

    /// Returns `true` if the backend rejected a write for lack of space.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::Storage(StorageError::QuotaExceeded { .. }))
    }
}
