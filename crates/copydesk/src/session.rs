//! Save and restore of in-progress form state.
//!
//! Each form has one [`SessionSlot`] holding a single JSON snapshot. Saving
//! overwrites the previous snapshot; there is no history.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::backend::Storage;
use crate::blob::Blob;
use crate::clock::Clock;
use crate::collab::Idea;
use crate::keys::{Keys, names};
use crate::logging::{debug, error, warn};

/// A form snapshot stored in a [`SessionSlot`].
pub trait Snapshot: Serialize + DeserializeOwned {
    /// Blob name of the slot.
    const NAME: &'static str;

    /// Record when the snapshot was taken.
    fn stamp(&mut self, at: DateTime<Utc>);
}

/// The daily-inspiration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdeationSession {
    /// Product chosen in the picker, `None` for "surprise me".
    pub selected_product: Option<String>,
    pub ideas: Vec<Idea>,
    /// Product the current ideas were generated for.
    pub product: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Snapshot for IdeationSession {
    const NAME: &'static str = names::IDEATION_SESSION;

    fn stamp(&mut self, at: DateTime<Utc>) {
        self.timestamp = Some(at);
    }
}

/// The adapt-and-translate form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformSession {
    pub source_text: String,
    pub adapted_text: String,
    pub platform: String,
    pub audience: String,
    pub translated_content: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Snapshot for TransformSession {
    const NAME: &'static str = names::TRANSFORM_SESSION;

    fn stamp(&mut self, at: DateTime<Utc>) {
        self.timestamp = Some(at);
    }
}

/// One snapshot slot, borrowed from a [`Desk`](crate::Desk).
pub struct SessionSlot<'a, S> {
    blob: Blob<'a>,
    clock: &'a dyn Clock,
    _snapshot: PhantomData<S>,
}

impl<'a, S: Snapshot> SessionSlot<'a, S> {
    pub(crate) fn new(storage: &'a dyn Storage, clock: &'a dyn Clock, keys: &Keys) -> Self {
        Self {
            blob: Blob::new(storage, keys.key(S::NAME)),
            clock,
            _snapshot: PhantomData,
        }
    }

    /// Stamp `snapshot` with the current time and store it, replacing any
    /// earlier one.
    pub fn save(&self, mut snapshot: S) -> bool {
        snapshot.stamp(self.clock.now());
        match self.blob.write_json(&snapshot) {
            Ok(()) => {
                debug!(key = %self.blob.key(), "session saved");
                true
            }
            Err(err) => {
                error!(key = %self.blob.key(), error = %err, "failed to save session");
                false
            }
        }
    }

    /// The stored snapshot, `None` when absent or unreadable.
    pub fn load(&self) -> Option<S> {
        match self.blob.read_json() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(key = %self.blob.key(), error = %err, "discarding unreadable session");
                None
            }
        }
    }

    /// Drop the stored snapshot.
    pub fn clear(&self) -> bool {
        match self.blob.remove() {
            Ok(()) => true,
            Err(err) => {
                error!(key = %self.blob.key(), error = %err, "failed to clear session");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::backend::MemoryBackend;
    use crate::clock::ManualClock;

    fn clock() -> ManualClock {
        ManualClock::on(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
    }

    #[test]
    fn test_ideation_round_trip_stamps_time() {
        let storage = MemoryBackend::new();
        let clock = clock();
        let keys = Keys::default();
        let slot: SessionSlot<'_, IdeationSession> = SessionSlot::new(&storage, &clock, &keys);

        assert_eq!(slot.load(), None);
        let session = IdeationSession {
            selected_product: Some("RockMa Aesthetic Apparel".to_string()),
            ideas: vec![Idea {
                hook: "h".to_string(),
                script: "s".to_string(),
                hashtags: "#x".to_string(),
            }],
            product: Some("RockMa Aesthetic Apparel".to_string()),
            timestamp: None,
        };
        assert!(slot.save(session.clone()));

        let loaded = slot.load().unwrap();
        assert_eq!(loaded.timestamp, Some(clock.now()));
        assert_eq!(loaded.ideas, session.ideas);

        let raw = storage.get("rockma_ideationSession").unwrap().unwrap();
        assert!(raw.contains("\"selectedProduct\""));
    }

    #[test]
    fn test_save_overwrites_and_clear_removes() {
        let storage = MemoryBackend::new();
        let clock = clock();
        let keys = Keys::default();
        let slot: SessionSlot<'_, TransformSession> = SessionSlot::new(&storage, &clock, &keys);

        slot.save(TransformSession {
            source_text: "first".to_string(),
            ..Default::default()
        });
        clock.tick();
        slot.save(TransformSession {
            source_text: "second".to_string(),
            platform: "LinkedIn".to_string(),
            ..Default::default()
        });
        let loaded = slot.load().unwrap();
        assert_eq!(loaded.source_text, "second");
        assert_eq!(loaded.timestamp, Some(clock.now()));

        assert!(slot.clear());
        assert_eq!(slot.load(), None);
        // Clearing an empty slot is fine
        assert!(slot.clear());
    }

    #[test]
    fn test_partial_and_corrupt_snapshots() {
        let storage = MemoryBackend::new();
        let clock = clock();
        let keys = Keys::default();
        let slot: SessionSlot<'_, TransformSession> = SessionSlot::new(&storage, &clock, &keys);

        storage.set("rockma_transformSession", r#"{"sourceText":"only this"}"#).unwrap();
        let loaded = slot.load().unwrap();
        assert_eq!(loaded.source_text, "only this");
        assert_eq!(loaded.adapted_text, "");
        assert_eq!(loaded.timestamp, None);

        storage.set("rockma_transformSession", "{not json").unwrap();
        assert_eq!(slot.load(), None);
    }

    #[test]
    fn test_save_failure_returns_false() {
        let storage = MemoryBackend::with_quota(8);
        let clock = clock();
        let keys = Keys::default();
        let slot: SessionSlot<'_, IdeationSession> = SessionSlot::new(&storage, &clock, &keys);
        assert!(!slot.save(IdeationSession::default()));
    }
}
