//! In-process backend with an optional size quota.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::logging::{trace, warn};

use super::{Storage, StorageError};

/// Roughly the per-origin budget a browser grants durable storage.
pub const BROWSER_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// A [`Storage`] kept entirely in memory.
///
/// Usage is measured as the byte length of every key plus its value. When a
/// quota is set, a write that would push usage past it fails with
/// [`StorageError::QuotaExceeded`] and leaves the previous value in place.
///
/// # Example
///
/// ```ignore
/// use copydesk::backend::{MemoryBackend, Storage};
///
/// let backend = MemoryBackend::with_quota(64);
/// backend.set("greeting", "hello")?;
/// assert!(backend.set("blob", &"x".repeat(100)).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    /// Create an empty backend with no quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty backend that rejects writes past `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            quota: Some(quota),
        }
    }

    /// Bytes currently used by keys and values.
    pub fn usage(&self) -> usize {
        self.entries
            .read()
            .map(|entries| Self::measure(&entries))
            .unwrap_or(0)
    }

    fn measure(entries: &BTreeMap<String, String>) -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Storage for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        trace!(key = key, found = entries.contains_key(key), "memory get");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;

        if let Some(quota) = self.quota {
            let current = Self::measure(&entries);
            let replaced = entries.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
            let required = current - replaced + key.len() + value.len();
            if required > quota {
                warn!(key = key, required = required, quota = quota, "memory quota exceeded");
                return Err(StorageError::QuotaExceeded { required, quota });
            }
        }

        trace!(key = key, bytes = value.len(), "memory set");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        trace!(key = key, "memory remove");
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("a").unwrap(), None);

        backend.set("a", "1").unwrap();
        backend.set("b", "2").unwrap();
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(backend.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);

        backend.remove("a").unwrap();
        backend.remove("missing").unwrap();
        assert_eq!(backend.get("a").unwrap(), None);
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let backend = MemoryBackend::with_quota(10);
        backend.set("k", "12345").unwrap();

        let err = backend.set("other", "123456").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { required: 17, quota: 10 }));

        // The failed write leaves existing data untouched
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("12345"));
        assert_eq!(backend.usage(), 6);
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let backend = MemoryBackend::with_quota(10);
        backend.set("k", "123456789").unwrap();
        // Overwriting frees the old value before measuring
        backend.set("k", "987654321").unwrap();
        assert_eq!(backend.usage(), 10);
    }

    #[test]
    fn test_browser_quota() {
        let backend = MemoryBackend::with_quota(BROWSER_QUOTA_BYTES);
        backend.set("rockma_recentDrafts", &"x".repeat(1024 * 1024)).unwrap();
        let err = backend.set("rockma_analytics", &"y".repeat(BROWSER_QUOTA_BYTES)).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    }
}
