//! Time source for timestamps, ids and calendar days.

use std::sync::RwLock;

use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};

/// Supplies the current instant and the current calendar day.
///
/// Record ids and timestamps come from [`now`](Clock::now); streaks and
/// analytics windows work on [`today`](Clock::today).
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar day in the operator's timezone.
    fn today(&self) -> NaiveDate;
}

/// The wall clock, with calendar days in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to.
///
/// Calendar days are taken in UTC so results do not depend on the host
/// timezone.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use copydesk::{Clock, ManualClock};
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default();
/// let clock = ManualClock::on(day);
/// clock.advance_days(1);
/// assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap_or_default());
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Start the clock at noon UTC on `day`.
    pub fn on(day: NaiveDate) -> Self {
        let noon = day.and_hms_opt(12, 0, 0).unwrap_or_default();
        Self::new(noon.and_utc())
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        match self.now.write() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    /// Move forward (or backward, for a negative delta) by `delta`.
    pub fn advance(&self, delta: TimeDelta) {
        let next = self.now() + delta;
        self.set(next);
    }

    /// Move by whole days.
    pub fn advance_days(&self, days: i64) {
        self.advance(TimeDelta::days(days));
    }

    /// Move forward one millisecond, enough to get a fresh record id.
    pub fn tick(&self) {
        self.advance(TimeDelta::milliseconds(1));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Millisecond-timestamp id for a record created at `at`.
pub(crate) fn time_id(at: DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_manual_clock_crosses_month_and_year() {
        let clock = ManualClock::on(day(2023, 12, 31));
        clock.advance_days(1);
        assert_eq!(clock.today(), day(2024, 1, 1));
        clock.advance_days(-2);
        assert_eq!(clock.today(), day(2023, 12, 30));
    }

    #[test]
    fn test_tick_changes_id_not_day() {
        let clock = ManualClock::on(day(2024, 5, 5));
        let first = time_id(clock.now());
        clock.tick();
        let second = time_id(clock.now());
        assert_ne!(first, second);
        assert_eq!(clock.today(), day(2024, 5, 5));
    }
}
