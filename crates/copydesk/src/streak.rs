//! Consecutive-day usage counter.
//!
//! Two plain-text blobs back the streak: `lastActive` holds the last day the
//! operator showed up as `YYYY-MM-DD`, and `streakCount` holds the count as
//! a decimal integer.

use chrono::NaiveDate;
use serde::Serialize;

use crate::backend::{Storage, StorageError};
use crate::blob::Blob;
use crate::clock::Clock;
use crate::keys::{Keys, names};
use crate::logging::{debug, error, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stored streak fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub last_active_date: NaiveDate,
    pub streak_count: u32,
}

/// Daily streak, borrowed from a [`Desk`](crate::Desk).
pub struct StreakTracker<'a> {
    last_active: Blob<'a>,
    count: Blob<'a>,
    clock: &'a dyn Clock,
}

impl<'a> StreakTracker<'a> {
    pub(crate) fn new(storage: &'a dyn Storage, clock: &'a dyn Clock, keys: &Keys) -> Self {
        Self {
            last_active: Blob::new(storage, keys.key(names::LAST_ACTIVE)),
            count: Blob::new(storage, keys.key(names::STREAK_COUNT)),
            clock,
        }
    }

    /// Check in for today and return the streak.
    ///
    /// The first check-in ever starts at 1. A second check-in on the same
    /// day returns the stored count and writes nothing. A check-in the day
    /// after the last one extends the streak by one; any other gap
    /// (including a clock that went backwards) restarts it at 1.
    ///
    /// A failed write is logged and the computed count is still returned.
    pub fn touch(&self) -> u32 {
        let today = self.clock.today();
        let stored = self.peek();

        let next = match self.last_active_date() {
            None => 1,
            Some(last) if last == today => return stored,
            Some(last) if last.succ_opt() == Some(today) => stored.saturating_add(1),
            Some(_) => 1,
        };

        if let Err(err) = self.persist(today, next, stored) {
            error!(error = %err, "failed to persist streak");
        } else {
            debug!(streak = next, day = %today, "streak updated");
        }
        next
    }

    /// The stored count, without checking in. 0 when unset or unreadable.
    pub fn peek(&self) -> u32 {
        match self.count.read() {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(key = %self.count.key(), value = %raw, "unparseable streak count");
                0
            }),
            Ok(None) => 0,
            Err(err) => {
                error!(key = %self.count.key(), error = %err, "failed to read streak count");
                0
            }
        }
    }

    /// Both stored fields, `None` before the first check-in.
    pub fn state(&self) -> Option<StreakState> {
        self.last_active_date().map(|last_active_date| StreakState {
            last_active_date,
            streak_count: self.peek(),
        })
    }

    fn last_active_date(&self) -> Option<NaiveDate> {
        let raw = match self.last_active.read() {
            Ok(raw) => raw?,
            Err(err) => {
                error!(key = %self.last_active.key(), error = %err, "failed to read last active day");
                return None;
            }
        };
        match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
            Ok(day) => Some(day),
            Err(_) => {
                warn!(key = %self.last_active.key(), value = %raw, "unparseable last active day");
                None
            }
        }
    }

    /// Write the count, then the day. The same-day path trusts the count
    /// once the day is stored, so a failed day write puts `previous` back.
    fn persist(&self, today: NaiveDate, count: u32, previous: u32) -> Result<(), StorageError> {
        self.count.write(&count.to_string())?;
        if let Err(err) = self.last_active.write(&today.format(DATE_FORMAT).to_string()) {
            if let Err(undo) = self.count.write(&previous.to_string()) {
                error!(key = %self.count.key(), error = %undo, "failed to restore streak count");
            }
            return Err(err);
        }
        Ok(())
    }
}
