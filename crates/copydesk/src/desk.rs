//! The [`Desk`] facade.
//!
//! A `Desk` owns the storage backend, the clock, the key layout and the
//! product catalog, and hands out short-lived borrowed views for each
//! store. Views are cheap; create one per operation.

use std::sync::Arc;

use crate::analytics::{Action, Ledger};
use crate::backend::Storage;
use crate::clock::{Clock, SystemClock};
use crate::collection::{ClipStore, Collection, DraftStore, FavoriteStore};
use crate::config::{CatalogConfig, Config};
use crate::dashboard::Dashboard;
use crate::keys::Keys;
use crate::logging::{debug, error, info};
use crate::records::{ContentKind, Metadata};
use crate::session::{IdeationSession, SessionSlot, TransformSession};
use crate::streak::StreakTracker;

/// Entry point to every copydesk store.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use copydesk::{ContentKind, Desk, MemoryBackend, Metadata};
///
/// let desk = Desk::new(Arc::new(MemoryBackend::new()));
/// assert!(desk.drafts().save(ContentKind::RawIdea, "Body butter for dads", Metadata::new()));
/// assert_eq!(desk.drafts().len(), 1);
/// ```
#[derive(Clone)]
pub struct Desk {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    keys: Keys,
    catalog: Vec<String>,
}

impl Desk {
    /// A desk on `storage` with the system clock, default keys and the
    /// default catalog.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            keys: Keys::default(),
            catalog: CatalogConfig::default().products,
        }
    }

    /// A desk on `storage` set up from `config`.
    pub fn from_config(storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            keys: config.keys(),
            catalog: config.catalog.products.clone(),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.keys = Keys::new(prefix);
        self
    }

    /// Replace the product catalog.
    pub fn with_catalog(mut self, catalog: Vec<String>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn drafts(&self) -> DraftStore<'_> {
        Collection::new(self.storage.as_ref(), self.clock.as_ref(), &self.keys)
    }

    pub fn favorites(&self) -> FavoriteStore<'_> {
        Collection::new(self.storage.as_ref(), self.clock.as_ref(), &self.keys)
    }

    pub fn clips(&self) -> ClipStore<'_> {
        Collection::new(self.storage.as_ref(), self.clock.as_ref(), &self.keys)
    }

    pub fn streak(&self) -> StreakTracker<'_> {
        StreakTracker::new(self.storage.as_ref(), self.clock.as_ref(), &self.keys)
    }

    /// The analytics ledger, judging product attention against the catalog.
    pub fn analytics(&self) -> Ledger<'_> {
        Ledger::new(
            self.storage.as_ref(),
            self.clock.as_ref(),
            &self.keys,
            &self.catalog,
        )
    }

    pub fn ideation_session(&self) -> SessionSlot<'_, IdeationSession> {
        SessionSlot::new(self.storage.as_ref(), self.clock.as_ref(), &self.keys)
    }

    pub fn transform_session(&self) -> SessionSlot<'_, TransformSession> {
        SessionSlot::new(self.storage.as_ref(), self.clock.as_ref(), &self.keys)
    }

    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(
            self.storage.as_ref(),
            self.clock.as_ref(),
            &self.keys,
            &self.catalog,
        )
    }

    /// Record a successful clipboard copy of `content`.
    ///
    /// Returns `false` when the same content was already recorded as
    /// copied, or when the write fails.
    pub fn record_copy(
        &self,
        content: &str,
        kind: &str,
        platform: Option<&str>,
        product: Option<&str>,
    ) -> bool {
        self.analytics()
            .record(Action::Copied, content, kind, platform, product)
    }

    /// Star `content`: save it as a favorite and record a `starred` event.
    ///
    /// Content that is already a favorite is left alone and `false` is
    /// returned. The event takes its platform and product from the
    /// matching `metadata` fields.
    pub fn star(&self, content: &str, kind: ContentKind, metadata: Metadata) -> bool {
        let favorites = self.favorites();
        if favorites.is_favorited(content) {
            debug!("content already starred");
            return false;
        }

        let platform = metadata_field(&metadata, "platform");
        let product = metadata_field(&metadata, "product");
        if !favorites.save(content, kind, metadata) {
            return false;
        }
        // A repeat event is rejected by the ledger; the favorite still counts
        self.analytics().record(
            Action::Starred,
            content,
            kind.as_str(),
            platform.as_deref(),
            product.as_deref(),
        );
        true
    }

    /// Remove every blob this desk owns.
    ///
    /// Keeps going past failures and returns `false` if any removal failed.
    pub fn reset(&self) -> bool {
        let mut ok = true;
        for key in self.keys.all() {
            if let Err(err) = self.storage.remove(&key) {
                error!(key = %key, error = %err, "failed to remove key during reset");
                ok = false;
            }
        }
        info!(prefix = %self.keys.prefix(), ok = ok, "desk reset");
        ok
    }
}

fn metadata_field(metadata: &Metadata, field: &str) -> Option<String> {
    metadata
        .get(field)
        .and_then(|value| value.as_str())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
