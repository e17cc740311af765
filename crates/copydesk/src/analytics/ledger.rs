//! The de-duplicated action log.

use crate::backend::Storage;
use crate::clock::Clock;
use crate::collection::Collection;
use crate::hash::content_hash;
use crate::keys::Keys;
use crate::logging::debug;
use crate::timeframe::Timeframe;

use super::aggregate::{self, ActivityBucket, PlatformShare, ProductAttention};
use super::{Action, AnalyticsEntry};

/// Append-only analytics log, borrowed from a [`Desk`](crate::Desk).
///
/// # Example
///
/// ```ignore
/// let ledger = desk.analytics();
/// assert!(ledger.record(Action::Copied, "Buy our butter!", "Daily Idea", Some("TikTok"), None));
/// // Same content, same action: rejected
/// assert!(!ledger.record(Action::Copied, "  buy our BUTTER! ", "Daily Idea", Some("TikTok"), None));
/// ```
pub struct Ledger<'a> {
    entries: Collection<'a, AnalyticsEntry>,
    clock: &'a dyn Clock,
    inventory: &'a [String],
}

impl<'a> Ledger<'a> {
    pub(crate) fn new(
        storage: &'a dyn Storage,
        clock: &'a dyn Clock,
        keys: &Keys,
        inventory: &'a [String],
    ) -> Self {
        Self {
            entries: Collection::new(storage, clock, keys),
            clock,
            inventory,
        }
    }

    /// Log `action` on `content`.
    ///
    /// Returns `false` without writing when an entry with the same content
    /// hash and action already exists anywhere in the ledger, or when the
    /// write fails.
    pub fn record(
        &self,
        action: Action,
        content: &str,
        kind: &str,
        platform: Option<&str>,
        product: Option<&str>,
    ) -> bool {
        let hash = content_hash(content);
        let now = self.clock.now();
        let entry = AnalyticsEntry {
            id: self.entries.next_id(),
            date: self.clock.today(),
            action,
            content_hash: hash.clone(),
            platform: platform.map(str::to_string),
            product: product.map(str::to_string),
            kind: kind.to_string(),
            timestamp: now,
        };
        debug!(action = %action, hash = %hash, "recording analytics entry");
        self.entries
            .insert_unless(entry, |e| e.content_hash == hash && e.action == action)
    }

    /// Whether `(hash, action)` has been logged.
    pub fn contains(&self, hash: &str, action: Action) -> bool {
        self.entries
            .list()
            .iter()
            .any(|e| e.content_hash == hash && e.action == action)
    }

    /// Every entry, newest first.
    pub fn entries(&self) -> Vec<AnalyticsEntry> {
        self.entries.list()
    }

    /// Empty the ledger.
    pub fn clear(&self) -> bool {
        self.entries.clear()
    }

    /// Share of copies per platform. See [`aggregate::platform_distribution`].
    pub fn platform_distribution(&self, timeframe: Timeframe) -> Vec<PlatformShare> {
        aggregate::platform_distribution(&self.entries(), timeframe, self.clock.today())
    }

    /// Most and least attended products, judged against the configured
    /// catalog. See [`aggregate::product_attention`].
    pub fn product_attention(&self, timeframe: Timeframe) -> ProductAttention {
        aggregate::product_attention(
            &self.entries(),
            timeframe,
            self.clock.today(),
            self.inventory,
        )
    }

    /// Unique assets touched. See [`aggregate::creative_output`].
    pub fn creative_output(&self, timeframe: Timeframe) -> usize {
        aggregate::creative_output(&self.entries(), timeframe, self.clock.today())
    }

    /// Activity chart buckets. See [`aggregate::activity`].
    pub fn activity(&self, timeframe: Timeframe) -> Vec<ActivityBucket> {
        aggregate::activity(&self.entries(), timeframe, self.clock.today())
    }
}
