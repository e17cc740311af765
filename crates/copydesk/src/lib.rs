//! Client-side persistence and engagement analytics for a marketing-content
//! assistant.
//!
//! copydesk keeps an operator's personal workflow state (recent drafts,
//! starred favorites, clipped ideas, a daily-use streak, a de-duplicated
//! analytics ledger and in-progress form snapshots) as JSON blobs under
//! fixed string keys in a key-value [`Storage`] backend.
//!
//! # Module Organization
//!
//! - [`backend`]: The storage substrate (in-memory and fjall-backed)
//! - [`desk`]: The [`Desk`] facade that hands out every store below
//! - [`collection`]: Bounded newest-first record collections
//! - [`records`]: Draft, favorite and idea-clip record types
//! - [`streak`]: Consecutive-day usage counter
//! - [`analytics`]: Append-only action ledger and its aggregators
//! - [`session`]: Save/restore of in-progress form state
//! - [`dashboard`]: Product spotlight and first-visit flag
//! - [`hash`], [`clock`], [`timeframe`]: Small shared utilities
//! - [`config`]: TOML configuration
//! - `logging`: Conditional logging macros (internal)
//!
//! # Features
//!
//! - `fjall` (default): Durable on-disk backend
//! - `logging`: Enable tracing-based logging
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use copydesk::prelude::*;
//!
//! let desk = Desk::new(Arc::new(MemoryBackend::new()));
//!
//! desk.drafts().save(ContentKind::DailyIdea, "Glow all day", Metadata::new());
//! desk.record_copy("Glow all day", "Daily Idea", Some("TikTok"), None);
//!
//! let streak = desk.streak().touch();
//! let shares = desk.analytics().platform_distribution(Timeframe::Month);
//! ```
//!
//! # Failure model
//!
//! Every store operation completes synchronously and never returns an error
//! to the caller: write failures and corrupt blobs are logged and surface as
//! `false`, `None` or an empty collection.

pub mod analytics;
pub mod backend;
mod blob;
pub mod clock;
pub mod collab;
pub mod collection;
pub mod config;
pub mod dashboard;
pub mod desk;
pub mod error;
pub mod hash;
pub mod keys;
#[macro_use]
pub(crate) mod logging;
pub mod prelude;
pub mod records;
pub mod session;
pub mod streak;
pub mod timeframe;

// Re-export unified error types
pub use error::{Error, Result};

pub use analytics::{
    Action, ActivityBucket, AnalyticsEntry, Ledger, PlatformShare, ProductAttention, ProductCount,
};
pub use backend::{MemoryBackend, Storage, StorageError};
#[cfg(feature = "fjall")]
pub use backend::FjallBackend;
pub use clock::{Clock, ManualClock, SystemClock};
pub use collab::{AdaptedText, GeneratedIdeas, Idea, TranslatedContent};
pub use collection::{ClipStore, Collection, DraftStore, FavoriteStore};
pub use config::{Config, ConfigError, LogFormat, LoggingConfig};
pub use dashboard::Dashboard;
pub use desk::Desk;
pub use hash::content_hash;
pub use keys::Keys;
pub use records::{ClipIntent, ContentKind, Draft, Favorite, IdeaClip, Metadata};
pub use session::{IdeationSession, SessionSlot, TransformSession};
pub use streak::{StreakState, StreakTracker};
pub use timeframe::Timeframe;
