//! Error types for the storage backends.

use thiserror::Error;

/// Errors that can occur while reading or writing a backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "fjall")]
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Storage quota exceeded: {required} bytes required, quota is {quota} bytes")]
    QuotaExceeded { required: usize, quota: usize },

    #[error("Value under key '{0}' is not valid UTF-8")]
    InvalidUtf8(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Storage lock poisoned")]
    Poisoned,
}
