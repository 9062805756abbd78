//! Polymorphic event entity model.
//!
//! One physical row per event. The common columns (child, entry date,
//! time-of-day bucket, creation instant, notes, soft-delete flag) live as
//! real columns so the timeline query and its index never touch the
//! payload; the variant-specific fields are a serde-tagged enum stored as
//! JSONB, with the discriminator mirrored into the indexed `kind` column.

use nestling_core::timeline::TimelineEntry;
use nestling_core::types::{CalendarDate, DbId, EventKind, TimeOfDay, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A behavior event's optional reaction block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Reaction-kind tag references.
    pub tag_ids: Vec<DbId>,
    /// Optional feeling-kind tag reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeling_id: Option<DbId>,
}

/// Variant-specific event fields. Exactly one per event row; the serde
/// tag matches the `events.kind` discriminator column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum EventPayload {
    Behavior {
        tag_ids: Vec<DbId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reaction: Option<Reaction>,
    },
    Activity {
        tag_ids: Vec<DbId>,
    },
    Therapy {
        tag_ids: Vec<DbId>,
    },
    Sleep {
        /// `"HH:mm"`.
        bed_time: String,
        /// `"HH:mm"`.
        wake_up_time: String,
        /// Sleep-kind tag references (night incidents).
        incident_ids: Vec<DbId>,
    },
    Medication {
        child_medication_id: DbId,
    },
}

impl EventPayload {
    /// The discriminator this payload mirrors into `events.kind`.
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::Behavior { .. } => EventKind::Behavior,
            EventPayload::Activity { .. } => EventKind::Activity,
            EventPayload::Therapy { .. } => EventKind::Therapy,
            EventPayload::Sleep { .. } => EventKind::Sleep,
            EventPayload::Medication { .. } => EventKind::Medication,
        }
    }
}

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub child_id: DbId,
    /// Persistence code of the discriminator; see [`EventKind::code`].
    pub kind: i16,
    pub entry_date: CalendarDate,
    /// Persistence code / sort ordinal; see [`TimeOfDay::code`].
    pub time_of_day: i16,
    pub tracked_at: Timestamp,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub payload: Json<EventPayload>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::from_code(self.kind)
    }
}

impl TimelineEntry for Event {
    fn entry_date(&self) -> CalendarDate {
        self.entry_date
    }

    fn time_of_day(&self) -> TimeOfDay {
        // Codes outside 0..=2 cannot be written through the public API.
        TimeOfDay::from_code(self.time_of_day).unwrap_or(TimeOfDay::Evening)
    }

    fn tracked_at(&self) -> Timestamp {
        self.tracked_at
    }
}

/// DTO for inserting a new event.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub child_id: DbId,
    pub entry_date: CalendarDate,
    pub time_of_day: TimeOfDay,
    pub tracked_at: Timestamp,
    pub notes: Option<String>,
    pub payload: EventPayload,
}

/// DTO for a partial event update. Only `Some` fields are applied;
/// `entry_date` and `time_of_day` always travel together (the `info`
/// block is atomic).
#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub entry_date: Option<CalendarDate>,
    pub time_of_day: Option<TimeOfDay>,
    pub notes: Option<String>,
    pub payload: Option<EventPayload>,
}
