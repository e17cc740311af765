//! Storage key layout.
//!
//! Every blob lives under `<prefix><name>`. The default prefix matches the
//! keys written by earlier releases, so existing stores keep loading.

/// Names of every blob this crate owns.
pub mod names {
    pub const RECENT_DRAFTS: &str = "recentDrafts";
    pub const FAVORITES: &str = "favorites";
    pub const IDEA_CLIPS: &str = "ideaClips";
    /// Pre-clip-intent name of the clip collection; read-only.
    pub const COMPETITOR_CLIPS: &str = "competitorClips";
    pub const ANALYTICS: &str = "analytics";
    pub const LAST_ACTIVE: &str = "lastActive";
    pub const STREAK_COUNT: &str = "streakCount";
    pub const IDEATION_SESSION: &str = "ideationSession";
    pub const TRANSFORM_SESSION: &str = "transformSession";
    pub const PRODUCT_OF_DAY: &str = "productOfDay";
    pub const PRODUCT_TIMESTAMP: &str = "productTimestamp";
    pub const FIRST_VISIT: &str = "firstVisit";

    /// All of the above, in a stable order.
    pub const ALL: [&str; 12] = [
        RECENT_DRAFTS,
        FAVORITES,
        IDEA_CLIPS,
        COMPETITOR_CLIPS,
        ANALYTICS,
        LAST_ACTIVE,
        STREAK_COUNT,
        IDEATION_SESSION,
        TRANSFORM_SESSION,
        PRODUCT_OF_DAY,
        PRODUCT_TIMESTAMP,
        FIRST_VISIT,
    ];
}

/// Builds full storage keys from blob names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys {
    prefix: String,
}

impl Keys {
    /// Prefix used when none is configured.
    pub const DEFAULT_PREFIX: &'static str = "rockma_";

    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full key for the blob called `name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Full keys of every blob this crate owns.
    pub fn all(&self) -> Vec<String> {
        names::ALL.iter().map(|name| self.key(name)).collect()
    }
}

impl Default for Keys {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}
