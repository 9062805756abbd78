//! Shared primitive types and domain enums.
//!
//! Every enum that is persisted carries a stable SMALLINT code so the
//! database never depends on Rust enum ordering, and a serde snake_case
//! name for the wire format.

use serde::{Deserialize, Serialize};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (event entry dates, date-of-birth) carry no time zone.
pub type CalendarDate = chrono::NaiveDate;

/// The six tag classifications in the catalog.
///
/// `Behavior`, `Activity`, `Therapy` and `Sleep` tags classify events of
/// the matching kind directly; `Reaction` and `Feeling` tags are only ever
/// referenced from a behavior event's reaction block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Behavior,
    Activity,
    Therapy,
    Sleep,
    Reaction,
    Feeling,
}

impl TagKind {
    /// Stable persistence code for the `tags.kind` column.
    pub fn code(self) -> i16 {
        match self {
            TagKind::Behavior => 0,
            TagKind::Activity => 1,
            TagKind::Therapy => 2,
            TagKind::Sleep => 3,
            TagKind::Reaction => 4,
            TagKind::Feeling => 5,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(TagKind::Behavior),
            1 => Some(TagKind::Activity),
            2 => Some(TagKind::Therapy),
            3 => Some(TagKind::Sleep),
            4 => Some(TagKind::Reaction),
            5 => Some(TagKind::Feeling),
            _ => None,
        }
    }

    /// Human-readable label used in validation error messages
    /// ("Invalid or disabled behavior tags").
    pub fn label(self) -> &'static str {
        match self {
            TagKind::Behavior => "behavior",
            TagKind::Activity => "activity",
            TagKind::Therapy => "therapy",
            TagKind::Sleep => "sleep",
            TagKind::Reaction => "reaction",
            TagKind::Feeling => "feeling",
        }
    }
}

/// Coarse time-of-day bucket for an event entry.
///
/// The persistence code doubles as the ordinal used by the timeline total
/// order: morning sorts before afternoon sorts before evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Stable persistence code and sort ordinal.
    pub fn code(self) -> i16 {
        match self {
            TimeOfDay::Morning => 0,
            TimeOfDay::Afternoon => 1,
            TimeOfDay::Evening => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(TimeOfDay::Morning),
            1 => Some(TimeOfDay::Afternoon),
            2 => Some(TimeOfDay::Evening),
            _ => None,
        }
    }

    /// Default bucket for a wall-clock hour when the caller supplies no
    /// explicit time of day: `[05:00, 12:00)` is morning, `[12:00, 17:00)`
    /// is afternoon, everything else is evening.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }
}

/// Day of week for medication schedules. Codes are 0=Monday .. 6=Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn code(self) -> i16 {
        match self {
            DayOfWeek::Monday => 0,
            DayOfWeek::Tuesday => 1,
            DayOfWeek::Wednesday => 2,
            DayOfWeek::Thursday => 3,
            DayOfWeek::Friday => 4,
            DayOfWeek::Saturday => 5,
            DayOfWeek::Sunday => 6,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(DayOfWeek::Monday),
            1 => Some(DayOfWeek::Tuesday),
            2 => Some(DayOfWeek::Wednesday),
            3 => Some(DayOfWeek::Thursday),
            4 => Some(DayOfWeek::Friday),
            5 => Some(DayOfWeek::Saturday),
            6 => Some(DayOfWeek::Sunday),
            _ => None,
        }
    }
}

/// Discriminator for the polymorphic event record.
///
/// Exactly one variant payload exists per event row; the discriminator is
/// mirrored into its own indexed column so timeline queries never have to
/// inspect the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Behavior,
    Activity,
    Therapy,
    Sleep,
    Medication,
}

impl EventKind {
    /// Stable persistence code for the `events.kind` column.
    pub fn code(self) -> i16 {
        match self {
            EventKind::Behavior => 0,
            EventKind::Activity => 1,
            EventKind::Therapy => 2,
            EventKind::Sleep => 3,
            EventKind::Medication => 4,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(EventKind::Behavior),
            1 => Some(EventKind::Activity),
            2 => Some(EventKind::Therapy),
            3 => Some(EventKind::Sleep),
            4 => Some(EventKind::Medication),
            _ => None,
        }
    }
}

/// Parse an `"HH:mm"` clock string (used by sleep events and medication
/// schedule windows). Returns `(hour, minute)`.
pub fn parse_clock_time(value: &str) -> Option<(u32, u32)> {
    let (h, m) = value.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}
