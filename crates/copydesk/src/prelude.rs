//! Convenient re-exports for common usage patterns.
//!
//! This module provides a single import to bring all commonly used types
//! into scope.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use copydesk::prelude::*;
//!
//! let desk = Desk::new(Arc::new(MemoryBackend::new()));
//! desk.favorites().save("Glow all day", ContentKind::DailyIdea, Metadata::new());
//! let output = desk.analytics().creative_output(Timeframe::Week);
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Entry point and backends
pub use crate::backend::{MemoryBackend, Storage, StorageError};
#[cfg(feature = "fjall")]
pub use crate::backend::FjallBackend;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{Config, ConfigError};
pub use crate::desk::Desk;

// Records and stores
pub use crate::collection::{ClipStore, DraftStore, FavoriteStore};
pub use crate::records::{ClipIntent, ContentKind, Draft, Favorite, IdeaClip, Metadata};
pub use crate::session::{IdeationSession, TransformSession};
pub use crate::streak::StreakState;

// Analytics
pub use crate::analytics::{
    Action, ActivityBucket, AnalyticsEntry, PlatformShare, ProductAttention, ProductCount,
};
pub use crate::timeframe::Timeframe;

// Utilities
pub use crate::collab::{GeneratedIdeas, Idea};
pub use crate::hash::content_hash;
