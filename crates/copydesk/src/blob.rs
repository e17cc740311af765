//! A single keyed value in a backend, read and written as text or JSON.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{Storage, StorageError};
use crate::error::Error;
use crate::logging::trace;

/// One key of a [`Storage`], bound for repeated access.
#[derive(Clone)]
pub(crate) struct Blob<'a> {
    storage: &'a dyn Storage,
    key: String,
}

impl<'a> Blob<'a> {
    pub(crate) fn new(storage: &'a dyn Storage, key: String) -> Self {
        Self { storage, key }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn read(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(&self.key)
    }

    pub(crate) fn write(&self, value: &str) -> Result<(), StorageError> {
        self.storage.set(&self.key, value)
    }

    pub(crate) fn remove(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }

    /// Parse the stored text as JSON. An absent key is `Ok(None)`.
    pub(crate) fn read_json<T: DeserializeOwned>(&self) -> Result<Option<T>, Error> {
        let Some(raw) = self.read()? else {
            return Ok(None);
        };
        trace!(key = %self.key, bytes = raw.len(), "parsing blob");
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| Error::Corrupt {
                key: self.key.clone(),
                source,
            })
    }

    pub(crate) fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), Error> {
        let raw = serde_json::to_string(value).map_err(|source| Error::Serialize {
            key: self.key.clone(),
            source,
        })?;
        self.write(&raw)?;
        Ok(())
    }
}
