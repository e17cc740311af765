//! Week/month/all-time windows for analytics queries.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// The window an analytics query looks back over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// The last 7 calendar days.
    Week,
    /// The last 30 calendar days.
    #[default]
    Month,
    /// Everything ever recorded.
    All,
}

impl Timeframe {
    /// Number of days the window reaches back, `None` for all time.
    pub fn days(self) -> Option<u64> {
        match self {
            Timeframe::Week => Some(7),
            Timeframe::Month => Some(30),
            Timeframe::All => None,
        }
    }

    /// First day inside the window, `None` when unbounded.
    pub fn start(self, today: NaiveDate) -> Option<NaiveDate> {
        self.days().and_then(|n| today.checked_sub_days(Days::new(n)))
    }

    /// Whether an entry dated `date` falls inside the window ending `today`.
    ///
    /// Uses calendar-day subtraction: with `today = 2024-03-05`, the week
    /// window starts on `2024-02-27` regardless of the time of day.
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.start(today) {
            Some(start) => date >= start,
            None => true,
        }
    }
}

/// Free-function form of [`Timeframe::contains`].
pub fn within_window(date: NaiveDate, timeframe: Timeframe, today: NaiveDate) -> bool {
    timeframe.contains(date, today)
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::All => "all",
        };
        f.write_str(name)
    }
}

/// Unrecognized timeframe name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown timeframe '{0}' (expected week, month or all)")]
pub struct ParseTimeframeError(String);

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "all" => Ok(Timeframe::All),
            _ => Err(ParseTimeframeError(s.to_string())),
        }
    }
}
