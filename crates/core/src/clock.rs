//! Injected wall-clock dependency.
//!
//! Event creation defaults (`entry_date`, `time_of_day`, `tracked_at`) come
//! from a [`Clock`] handed in through application state, so tests pin time
//! explicitly instead of mutating process-wide state.

use crate::types::{CalendarDate, TimeOfDay, Timestamp};

/// Source of "now" for everything that stamps or defaults times.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Today's server-local calendar date.
    fn today(&self) -> CalendarDate {
        self.now().date_naive()
    }

    /// The time-of-day bucket for the current hour.
    fn time_of_day(&self) -> TimeOfDay {
        use chrono::Timelike;
        TimeOfDay::from_hour(self.now().hour())
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }
}

/// Test clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn fixed_clock_reports_pinned_instant() {
        let instant = Utc.with_ymd_and_hms(2021, 6, 27, 9, 30, 0).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.today(), instant.date_naive());
        assert_eq!(clock.time_of_day(), TimeOfDay::Morning);
    }

    #[test]
    fn fixed_clock_evening_hours() {
        let instant = Utc.with_ymd_and_hms(2021, 6, 27, 21, 0, 0).unwrap();
        assert_eq!(FixedClock(instant).time_of_day(), TimeOfDay::Evening);
    }
}
