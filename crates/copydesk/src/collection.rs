//! Bounded, newest-first record collections.
//!
//! A [`Collection`] stores every record of one type as a single JSON array
//! under one key. Each operation reads the array, changes it and writes it
//! back. Inserting prepends and then drops whatever falls past
//! [`Record::LIMIT`].
//!
//! Reads are forgiving: a blob that is not a JSON array is logged and read
//! as empty, and an element that does not fit the record type is logged and
//! left out of [`Collection::list`]. Such elements stay in place in the
//! stored array and are written back untouched. Writes never start from a
//! failed backend read; they report `false` instead.

use std::collections::HashSet;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::Storage;
use crate::blob::Blob;
use crate::clock::{Clock, time_id};
use crate::error::Error;
use crate::keys::Keys;
use crate::logging::{debug, error, info, warn};
use crate::records::{
    ClipIntent, ContentKind, Draft, Favorite, IdeaClip, Metadata, clip_notes,
};

/// A record type stored in a [`Collection`].
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Blob name the collection is stored under.
    const NAME: &'static str;
    /// Blob name an older release stored the same records under, read when
    /// [`NAME`](Record::NAME) has never been written.
    const LEGACY_NAME: Option<&'static str> = None;
    /// Maximum number of records kept.
    const LIMIT: usize;

    fn id(&self) -> &str;

    /// Fill in derived fields missing from older records.
    fn normalize(&mut self) {}
}

/// A record with editable text and a posted flag.
pub trait Editable: Record {
    fn body(&self) -> &str;

    /// Replace the text and recompute anything derived from it.
    fn set_body(&mut self, body: &str);

    /// `Some(at)` marks the record posted at `at`; `None` clears it.
    fn set_posted(&mut self, posted_at: Option<DateTime<Utc>>);
}

/// Recent drafts, newest first, at most three.
pub type DraftStore<'a> = Collection<'a, Draft>;
/// Starred favorites, newest first, at most twenty.
pub type FavoriteStore<'a> = Collection<'a, Favorite>;
/// Clipped ideas, newest first, at most fifty.
pub type ClipStore<'a> = Collection<'a, IdeaClip>;

/// One element of a stored array.
#[derive(Serialize)]
#[serde(untagged)]
enum Slot<R> {
    Record(R),
    /// JSON that does not parse as `R`, kept verbatim.
    Unreadable(serde_json::Value),
}

impl<R> Slot<R> {
    fn record(&self) -> Option<&R> {
        match self {
            Slot::Record(record) => Some(record),
            Slot::Unreadable(_) => None,
        }
    }

    fn record_mut(&mut self) -> Option<&mut R> {
        match self {
            Slot::Record(record) => Some(record),
            Slot::Unreadable(_) => None,
        }
    }

    fn into_record(self) -> Option<R> {
        match self {
            Slot::Record(record) => Some(record),
            Slot::Unreadable(_) => None,
        }
    }
}

/// Newest-first collection of `R`, borrowed from a [`Desk`](crate::Desk).
pub struct Collection<'a, R> {
    blob: Blob<'a>,
    legacy: Option<Blob<'a>>,
    clock: &'a dyn Clock,
    _record: PhantomData<R>,
}

impl<'a, R: Record> Collection<'a, R> {
    pub(crate) fn new(storage: &'a dyn Storage, clock: &'a dyn Clock, keys: &Keys) -> Self {
        Self {
            blob: Blob::new(storage, keys.key(R::NAME)),
            legacy: R::LEGACY_NAME.map(|name| Blob::new(storage, keys.key(name))),
            clock,
            _record: PhantomData,
        }
    }

    /// Every record, newest first. Unreadable data reads as empty.
    pub fn list(&self) -> Vec<R> {
        match self.load() {
            Ok(slots) => slots.into_iter().filter_map(Slot::into_record).collect(),
            Err(e) => {
                error!(key = %self.blob.key(), error = %e, "failed to read collection; treating as empty");
                Vec::new()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<R> {
        self.list().into_iter().find(|r| r.id() == id)
    }

    /// Remove the record with `id`. `false` if no record matched or the
    /// write failed.
    pub fn delete(&self, id: &str) -> bool {
        self.remove_where(|r| r.id() == id)
    }

    /// Remove every record whose id is in `ids`. `false` if none matched
    /// or the write failed.
    pub fn bulk_delete<I, S>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: HashSet<String> = ids.into_iter().map(|id| id.as_ref().to_string()).collect();
        if ids.is_empty() {
            return false;
        }
        self.remove_where(|r| ids.contains(r.id()))
    }

    /// Drop every record, leaving an empty array stored.
    pub fn clear(&self) -> bool {
        self.commit::<R>(&[], "clear")
    }

    /// Prepend `record` and evict past the limit.
    pub(crate) fn insert(&self, record: R) -> bool {
        self.insert_unless(record, |_| false)
    }

    /// Prepend `record` unless a stored record satisfies `duplicate`.
    ///
    /// The check and the write use the same read of the array.
    pub(crate) fn insert_unless(&self, record: R, duplicate: impl Fn(&R) -> bool) -> bool {
        let Some(mut slots) = self.load_for_write() else {
            return false;
        };
        if slots.iter().filter_map(Slot::record).any(&duplicate) {
            warn!(key = %self.blob.key(), id = record.id(), "matching record exists; insert rejected");
            return false;
        }
        slots.insert(0, Slot::Record(record));
        if slots.len() > R::LIMIT {
            debug!(key = %self.blob.key(), evicted = slots.len() - R::LIMIT, "evicting oldest records");
            slots.truncate(R::LIMIT);
        }
        self.commit(&slots, "insert")
    }

    /// Fresh time-derived id.
    pub(crate) fn next_id(&self) -> String {
        time_id(self.clock.now())
    }

    fn remove_where(&self, mut matches: impl FnMut(&R) -> bool) -> bool {
        let Some(mut slots) = self.load_for_write() else {
            return false;
        };
        let before = slots.len();
        slots.retain(|slot| !slot.record().is_some_and(&mut matches));
        if slots.len() == before {
            debug!(key = %self.blob.key(), "no record matched for removal");
            return false;
        }
        self.commit(&slots, "delete")
    }

    /// Apply `change` to the record with `id` and write back.
    pub(crate) fn modify(&self, id: &str, change: impl FnOnce(&mut R)) -> bool {
        let Some(mut slots) = self.load_for_write() else {
            return false;
        };
        let Some(record) = slots
            .iter_mut()
            .filter_map(Slot::record_mut)
            .find(|r| r.id() == id)
        else {
            debug!(key = %self.blob.key(), id = id, "record not found");
            return false;
        };
        change(record);
        self.commit(&slots, "update")
    }

    fn commit<T: Serialize>(&self, slots: &[T], op: &str) -> bool {
        match self.blob.write_json(slots) {
            Ok(()) => {
                debug!(key = %self.blob.key(), op = op, count = slots.len(), "collection written");
                true
            }
            Err(e) => {
                error!(key = %self.blob.key(), op = op, error = %e, "failed to write collection");
                false
            }
        }
    }

    /// The stored array as the base for a write. A corrupt blob starts
    /// over from empty; a failed backend read yields `None`.
    fn load_for_write(&self) -> Option<Vec<Slot<R>>> {
        match self.load() {
            Ok(slots) => Some(slots),
            Err(e) if e.is_corrupt() => {
                warn!(key = %self.blob.key(), error = %e, "overwriting corrupt collection");
                Some(Vec::new())
            }
            Err(e) => {
                error!(key = %self.blob.key(), error = %e, "failed to read collection; write skipped");
                None
            }
        }
    }

    fn load(&self) -> Result<Vec<Slot<R>>, Error> {
        let raw = match (self.blob.read()?, &self.legacy) {
            (Some(raw), _) => raw,
            (None, Some(legacy)) => match legacy.read()? {
                Some(raw) => {
                    info!(from = %legacy.key(), to = %self.blob.key(), "reading legacy collection");
                    raw
                }
                None => return Ok(Vec::new()),
            },
            (None, None) => return Ok(Vec::new()),
        };

        let values: Vec<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|source| Error::Corrupt {
                key: self.blob.key().to_string(),
                source,
            })?;

        Ok(values
            .into_iter()
            .map(|value| match R::deserialize(&value) {
                Ok(mut record) => {
                    record.normalize();
                    Slot::Record(record)
                }
                Err(e) => {
                    warn!(key = %self.blob.key(), error = %e, "keeping unreadable record as is");
                    Slot::Unreadable(value)
                }
            })
            .collect())
    }
}

impl<R: Editable> Collection<'_, R> {
    /// Replace the text of the record with `id`, recomputing its snippet.
    pub fn update_content(&self, id: &str, content: &str) -> bool {
        self.modify(id, |r| r.set_body(content))
    }

    /// Set or clear the posted flag; setting stamps the current time.
    pub fn mark_posted(&self, id: &str, posted: bool) -> bool {
        let at = posted.then(|| self.clock.now());
        self.modify(id, |r| r.set_posted(at))
    }
}

impl Collection<'_, Draft> {
    /// Save generated content as the newest draft.
    pub fn save(&self, kind: ContentKind, content: &str, metadata: Metadata) -> bool {
        let draft = Draft::new(
            self.next_id(),
            kind,
            content.to_string(),
            metadata,
            self.clock.now(),
        );
        self.insert(draft)
    }
}

impl Collection<'_, Favorite> {
    /// Star `content`. Identical content may be saved more than once;
    /// use [`is_favorited`](Self::is_favorited) to check first.
    pub fn save(&self, content: &str, kind: ContentKind, metadata: Metadata) -> bool {
        let favorite = Favorite::new(
            self.next_id(),
            content.to_string(),
            kind,
            metadata,
            self.clock.now(),
        );
        self.insert(favorite)
    }

    /// Whether a favorite holds exactly `content` (no trimming or case folding).
    pub fn is_favorited(&self, content: &str) -> bool {
        self.find_id_by_content(content).is_some()
    }

    /// Id of the newest favorite holding exactly `content`.
    pub fn find_id_by_content(&self, content: &str) -> Option<String> {
        self.list()
            .into_iter()
            .find(|fav| fav.content == content)
            .map(|fav| fav.id)
    }
}

impl Collection<'_, IdeaClip> {
    /// Clip a raw idea for later transformation.
    pub fn save(
        &self,
        text: &str,
        url: Option<&str>,
        intent: ClipIntent,
        notes: Option<&str>,
    ) -> bool {
        let clip = IdeaClip::new(
            self.next_id(),
            text.to_string(),
            url.map(str::to_string),
            intent,
            notes.map(str::to_string),
            self.clock.now(),
        );
        self.insert(clip)
    }

    /// Replace the notes on a clip, applying the same length bound as save.
    pub fn update_notes(&self, id: &str, notes: Option<&str>) -> bool {
        let notes = clip_notes(notes.map(str::to_string));
        self.modify(id, |clip| clip.notes = notes)
    }
}
