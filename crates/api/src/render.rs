//! Response shapes for events, with reference resolution.
//!
//! A stored event carries tag and schedule *ids*; the wire format carries
//! the resolved entities. Rendering goes through the request's batch
//! loaders, so a whole timeline page resolves its references in one query
//! per repository regardless of page size.
//!
//! Dangling references (a tag row removed from the catalog out-of-band)
//! are dropped from the rendered list rather than failing the read.

use futures::future::try_join_all;
use nestling_core::error::CoreError;
use nestling_core::timeline::TimelineEntry;
use nestling_core::types::{CalendarDate, DbId, TimeOfDay, Timestamp};
use nestling_db::models::event::{Event, EventPayload, Reaction};
use serde::Serialize;

use crate::loaders::RequestLoaders;

/// A resolved tag reference.
#[derive(Debug, Clone, Serialize)]
pub struct TagRef {
    pub id: DbId,
    pub name: String,
    pub group_name: String,
}

/// A behavior event's resolved reaction block.
#[derive(Debug, Clone, Serialize)]
pub struct ReactionView {
    pub tags: Vec<TagRef>,
    pub feeling: Option<TagRef>,
}

/// A resolved medication schedule reference.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub id: DbId,
    pub child_id: DbId,
    pub medication: Option<MedicationRef>,
    pub dose: Option<String>,
    pub dose_amount: Option<String>,
    pub schedule_from: Option<String>,
    pub schedule_to: Option<String>,
    pub days: Vec<i16>,
    pub send_reminder: bool,
}

/// A resolved medication catalog reference.
#[derive(Debug, Clone, Serialize)]
pub struct MedicationRef {
    pub id: DbId,
    pub name: String,
}

/// Variant-specific rendered fields; the serde tag mirrors the stored
/// payload's discriminator.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum EventBody {
    Behavior {
        tags: Vec<TagRef>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reaction: Option<ReactionView>,
    },
    Activity {
        tags: Vec<TagRef>,
    },
    Therapy {
        tags: Vec<TagRef>,
    },
    Sleep {
        bed_time: String,
        wake_up_time: String,
        incidents: Vec<TagRef>,
    },
    Medication {
        schedule: Option<ScheduleView>,
    },
}

/// One rendered event on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub id: DbId,
    pub child_id: DbId,
    pub entry_date: CalendarDate,
    pub time_of_day: TimeOfDay,
    pub tracked_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub body: EventBody,
}

async fn load_tag_refs(loaders: &RequestLoaders, ids: &[DbId]) -> Result<Vec<TagRef>, CoreError> {
    let tags = loaders.tags.load_many(ids).await?;
    Ok(tags
        .into_iter()
        .flatten()
        .map(|t| TagRef {
            id: t.id,
            name: t.name,
            group_name: t.group_name,
        })
        .collect())
}

async fn load_reaction(
    loaders: &RequestLoaders,
    reaction: &Reaction,
) -> Result<ReactionView, CoreError> {
    let tags = load_tag_refs(loaders, &reaction.tag_ids).await?;
    let feeling = match reaction.feeling_id {
        Some(id) => loaders.tags.load(id).await?.map(|t| TagRef {
            id: t.id,
            name: t.name,
            group_name: t.group_name,
        }),
        None => None,
    };
    Ok(ReactionView { tags, feeling })
}

async fn load_schedule(
    loaders: &RequestLoaders,
    id: DbId,
) -> Result<Option<ScheduleView>, CoreError> {
    let Some(schedule) = loaders.schedules.load(id).await? else {
        return Ok(None);
    };
    let medication = loaders
        .medications
        .load(schedule.medication_id)
        .await?
        .map(|m| MedicationRef {
            id: m.id,
            name: m.name,
        });
    Ok(Some(ScheduleView {
        id: schedule.id,
        child_id: schedule.child_id,
        medication,
        dose: schedule.dose,
        dose_amount: schedule.dose_amount,
        schedule_from: schedule.schedule_from,
        schedule_to: schedule.schedule_to,
        days: schedule.days,
        send_reminder: schedule.send_reminder,
    }))
}

/// Render a single event, resolving its references through the loaders.
pub async fn render_event(
    loaders: &RequestLoaders,
    event: &Event,
) -> Result<EventView, CoreError> {
    let body = match &event.payload.0 {
        EventPayload::Behavior { tag_ids, reaction } => {
            let tags = load_tag_refs(loaders, tag_ids).await?;
            let reaction = match reaction {
                Some(r) => Some(load_reaction(loaders, r).await?),
                None => None,
            };
            EventBody::Behavior { tags, reaction }
        }
        EventPayload::Activity { tag_ids } => EventBody::Activity {
            tags: load_tag_refs(loaders, tag_ids).await?,
        },
        EventPayload::Therapy { tag_ids } => EventBody::Therapy {
            tags: load_tag_refs(loaders, tag_ids).await?,
        },
        EventPayload::Sleep {
            bed_time,
            wake_up_time,
            incident_ids,
        } => EventBody::Sleep {
            bed_time: bed_time.clone(),
            wake_up_time: wake_up_time.clone(),
            incidents: load_tag_refs(loaders, incident_ids).await?,
        },
        EventPayload::Medication {
            child_medication_id,
        } => EventBody::Medication {
            schedule: load_schedule(loaders, *child_medication_id).await?,
        },
    };

    Ok(EventView {
        id: event.id,
        child_id: event.child_id,
        entry_date: event.entry_date,
        time_of_day: event.time_of_day(),
        tracked_at: event.tracked_at,
        notes: event.notes.clone(),
        body,
    })
}

/// Render a page of events concurrently so every reference load joins the
/// same loader batch.
pub async fn render_events(
    loaders: &RequestLoaders,
    events: &[Event],
) -> Result<Vec<EventView>, CoreError> {
    try_join_all(events.iter().map(|event| render_event(loaders, event))).await
}
