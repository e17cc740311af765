//! Storage substrate for copydesk.
//!
//! A [`Storage`] is a synchronous string-to-string map with per-key reads
//! and writes and no cross-key transactions, the same capability as a
//! browser's per-origin durable store. Every higher-level store in this
//! crate is written against the trait, so tests run on [`MemoryBackend`]
//! while real deployments use [`FjallBackend`].

mod error;
#[cfg(feature = "fjall")]
mod fjall;
mod memory;

pub use error::StorageError;
#[cfg(feature = "fjall")]
pub use fjall::FjallBackend;
pub use memory::{BROWSER_QUOTA_BYTES, MemoryBackend};

/// A key-value backend holding string values under string keys.
///
/// Implementations take `&self` and handle their own interior locking.
/// Concurrent writers to the same key follow last-write-wins.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// List every key currently stored, in backend order.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}
