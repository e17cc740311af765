//! Engagement analytics.
//!
//! The [`Ledger`] is an append-only log of "copied" and "starred" actions,
//! de-duplicated by `(content hash, action)`. The functions in [`aggregate`]
//! turn a snapshot of that log into the figures the strategy dashboard
//! shows: platform mix, product attention, unique assets and activity over
//! time.

pub mod aggregate;
mod ledger;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Record;
use crate::keys::names;

pub use aggregate::{ActivityBucket, PlatformShare, ProductAttention, ProductCount};
pub use ledger::Ledger;

/// Maximum number of ledger entries kept.
pub const LEDGER_LIMIT: usize = 1000;

/// The user action being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Copied,
    Starred,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Copied => "copied",
            Action::Starred => "starred",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized action name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown action '{0}' (expected copied or starred)")]
pub struct ParseActionError(String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copied" | "copy" => Ok(Action::Copied),
            "starred" | "star" => Ok(Action::Starred),
            _ => Err(ParseActionError(s.to_string())),
        }
    }
}

/// One logged action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEntry {
    pub id: String,
    /// Calendar day the action happened on.
    pub date: NaiveDate,
    pub action: Action,
    /// [`content_hash`](crate::content_hash) of the acted-on content.
    pub content_hash: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    /// Free-form source label, e.g. `Daily Idea`.
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

impl Record for AnalyticsEntry {
    const NAME: &'static str = names::ANALYTICS;
    const LIMIT: usize = LEDGER_LIMIT;

    fn id(&self) -> &str {
        &self.id
    }
}
