//! Timeline ordering rules and result shapes.
//!
//! The timeline merges every event variant into one feed under a single
//! deterministic total order: ascending `(entry_date, time_of_day ordinal,
//! tracked_at)`. Ties on the date alone are common (several entries per
//! day), so the time-of-day bucket and then the creation instant break
//! them. The store's timeline query orders by the same key; this module is
//! the single place the rule is written down and tested.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::{CalendarDate, TimeOfDay, Timestamp};

/// An inclusive, half-optional date window. A missing bound means
/// unbounded on that side; `from == to` is a valid single-day query.
///
/// `from > to` is accepted and simply matches nothing -- callers that
/// send an inverted window get an empty feed, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineWindow {
    pub from: Option<CalendarDate>,
    pub to: Option<CalendarDate>,
}

impl TimelineWindow {
    pub fn new(from: Option<CalendarDate>, to: Option<CalendarDate>) -> Self {
        Self { from, to }
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Anything that can be placed on the timeline.
pub trait TimelineEntry {
    fn entry_date(&self) -> CalendarDate;
    fn time_of_day(&self) -> TimeOfDay;
    fn tracked_at(&self) -> Timestamp;
}

/// The timeline total order.
pub fn compare<E: TimelineEntry>(a: &E, b: &E) -> Ordering {
    a.entry_date()
        .cmp(&b.entry_date())
        .then_with(|| a.time_of_day().cmp(&b.time_of_day()))
        .then_with(|| a.tracked_at().cmp(&b.tracked_at()))
}

/// Sort entries into timeline order. The store already orders its result
/// set; this exists for in-memory callers and for asserting the invariant.
pub fn sort_entries<E: TimelineEntry>(entries: &mut [E]) {
    entries.sort_by(compare);
}

/// Check that `entries` are in timeline order.
pub fn is_ordered<E: TimelineEntry>(entries: &[E]) -> bool {
    entries.windows(2).all(|w| compare(&w[0], &w[1]) != Ordering::Greater)
}

/// One page of the merged feed, with boundary-presence flags.
///
/// Each flag is `Some` exactly when the corresponding bound was supplied
/// (and the owner has at least one child): `has_events_before` answers
/// "does any non-deleted event exist strictly before `from`", via an
/// existence probe rather than a count. An owner with no children gets an
/// empty feed and both flags `None` regardless of bounds.
#[derive(Debug, Clone, Serialize)]
pub struct TimelinePage<E> {
    pub events: Vec<E>,
    pub has_events_before: Option<bool>,
    pub has_events_after: Option<bool>,
}

impl<E> TimelinePage<E> {
    /// The page for an empty child set: no events, both flags unknown.
    pub fn empty() -> Self {
        Self {
            events: Vec::new(),
            has_events_before: None,
            has_events_after: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        date: CalendarDate,
        tod: TimeOfDay,
        tracked_at: Timestamp,
    }

    impl TimelineEntry for Entry {
        fn entry_date(&self) -> CalendarDate {
            self.date
        }
        fn time_of_day(&self) -> TimeOfDay {
            self.tod
        }
        fn tracked_at(&self) -> Timestamp {
            self.tracked_at
        }
    }

    fn entry(date: (i32, u32, u32), tod: TimeOfDay, secs: i64) -> Entry {
        Entry {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            tod,
            tracked_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn orders_by_date_then_time_of_day_then_tracked_at() {
        let mut entries = vec![
            entry((2021, 6, 28), TimeOfDay::Morning, 50),
            entry((2021, 6, 27), TimeOfDay::Evening, 10),
            entry((2021, 6, 27), TimeOfDay::Morning, 99),
            entry((2021, 6, 27), TimeOfDay::Morning, 11),
        ];
        sort_entries(&mut entries);

        assert_eq!(entries[0], entry((2021, 6, 27), TimeOfDay::Morning, 11));
        assert_eq!(entries[1], entry((2021, 6, 27), TimeOfDay::Morning, 99));
        assert_eq!(entries[2], entry((2021, 6, 27), TimeOfDay::Evening, 10));
        assert_eq!(entries[3], entry((2021, 6, 28), TimeOfDay::Morning, 50));
        assert!(is_ordered(&entries));
    }

    #[test]
    fn tracked_at_never_outranks_time_of_day() {
        // An evening entry created first still sorts after a morning entry
        // created later on the same day.
        let mut entries = vec![
            entry((2021, 6, 27), TimeOfDay::Evening, 1),
            entry((2021, 6, 27), TimeOfDay::Morning, 1000),
        ];
        sort_entries(&mut entries);
        assert_eq!(entries[0].tod, TimeOfDay::Morning);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let day = |d| NaiveDate::from_ymd_opt(2021, 6, d).unwrap();
        let window = TimelineWindow::new(Some(day(10)), Some(day(20)));
        assert!(window.contains(day(10)));
        assert!(window.contains(day(20)));
        assert!(!window.contains(day(9)));
        assert!(!window.contains(day(21)));

        let single = TimelineWindow::new(Some(day(10)), Some(day(10)));
        assert!(single.contains(day(10)));
        assert!(!single.contains(day(11)));
    }

    #[test]
    fn missing_bounds_are_unbounded() {
        let day = |d| NaiveDate::from_ymd_opt(2021, 6, d).unwrap();
        let open = TimelineWindow::default();
        assert!(open.contains(day(1)));

        let from_only = TimelineWindow::new(Some(day(15)), None);
        assert!(from_only.contains(day(30)));
        assert!(!from_only.contains(day(14)));
    }

    #[test]
    fn inverted_window_matches_nothing() {
        let day = |d| NaiveDate::from_ymd_opt(2021, 6, d).unwrap();
        let inverted = TimelineWindow::new(Some(day(20)), Some(day(10)));
        assert!(!inverted.contains(day(10)));
        assert!(!inverted.contains(day(15)));
        assert!(!inverted.contains(day(20)));
    }

    #[test]
    fn empty_page_has_unknown_flags() {
        let page: TimelinePage<Entry> = TimelinePage::empty();
        assert!(page.events.is_empty());
        assert_eq!(page.has_events_before, None);
        assert_eq!(page.has_events_after, None);
    }
}
