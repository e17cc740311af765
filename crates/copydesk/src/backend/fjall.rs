//! Durable backend using fjall.

use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::logging::{debug, error, info, trace};

use super::{Storage, StorageError};

/// Keyspace holding the layout version.
const META_KEYSPACE: &str = "_meta";
const META_CONFIG_KEY: &str = "config";

/// Keyspace holding every copydesk blob.
const DATA_KEYSPACE: &str = "blobs";

/// Current on-disk layout version.
/// Opening a directory written with a different version is refused.
const STORE_VERSION: u32 = 1;

/// A [`Storage`] persisted to a directory with fjall.
///
/// One directory plays the role of one browser origin: every key lives in a
/// single keyspace and every write is synced before returning, so a process
/// crash never loses an acknowledged save.
///
/// # Example
///
/// ```ignore
/// use copydesk::backend::{FjallBackend, Storage};
///
/// let backend = FjallBackend::open(".copydesk")?;
/// backend.set("rockma_firstVisit", "true")?;
/// ```
pub struct FjallBackend {
    db: fjall::Database,
    data: Keyspace,
}

impl FjallBackend {
    /// Open the store at `path`, creating it on first use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening fjall backend");

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        match meta.get(META_CONFIG_KEY)? {
            Some(config) => {
                let version = u32::from_le_bytes(config.as_ref().try_into().map_err(|_| {
                    StorageError::InvalidFormat("Invalid config format".to_string())
                })?);
                if version != STORE_VERSION {
                    error!(
                        stored_version = version,
                        expected_version = STORE_VERSION,
                        "store version mismatch"
                    );
                    return Err(StorageError::InvalidFormat(format!(
                        "Store version mismatch: expected {}, got {}",
                        STORE_VERSION, version
                    )));
                }
                trace!(version = version, "store version verified");
            }
            None => {
                meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;
                info!(path = %path.display(), version = STORE_VERSION, "fjall store initialized");
            }
        }

        let data = db.keyspace(DATA_KEYSPACE, KeyspaceCreateOptions::default)?;
        db.persist(PersistMode::SyncAll)?;

        info!(path = %path.display(), "fjall backend opened");
        Ok(Self { db, data })
    }
}

impl Storage for FjallBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some(bytes) = self.data.get(key)? else {
            trace!(key = key, "fjall get miss");
            return Ok(None);
        };
        let value = String::from_utf8(bytes.to_vec())
            .map_err(|_| StorageError::InvalidUtf8(key.to_string()))?;
        trace!(key = key, bytes = value.len(), "fjall get hit");
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        trace!(key = key, bytes = value.len(), "fjall set");
        self.data.insert(key, value.as_bytes())?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        trace!(key = key, "fjall remove");
        self.data.remove(key)?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for kv in self.data.prefix("") {
            let Ok(key_bytes) = kv.key() else {
                continue;
            };
            keys.push(String::from_utf8_lossy(&key_bytes).into_owned());
        }
        Ok(keys)
    }
}
