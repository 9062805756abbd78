//! Handlers for the `/events` resource.
//!
//! One tracking endpoint per event variant, one edit endpoint per variant,
//! a reaction attachment endpoint for behavior events, and soft delete.
//! Every operation re-checks ownership through the store's scoped lookups;
//! an event on another user's child is reported exactly like a missing one.
//!
//! Tag names resolve against the acting user's enabled catalog at write
//! time. Stored id references are never re-filtered afterwards, so a later
//! disablement does not rewrite history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use nestling_core::error::CoreError;
use nestling_core::tags::{resolve_tag_by_name, resolve_tags};
use nestling_core::types::{parse_clock_time, CalendarDate, DbId, TagKind, TimeOfDay};
use nestling_db::models::event::{CreateEvent, Event, EventPayload, Reaction, UpdateEvent};
use nestling_db::models::user::User;
use nestling_db::repositories::{ChildMedicationRepo, ChildRepo, EventRepo, TagRepo};
use serde::{Deserialize, Serialize};

use crate::auth::{require_user, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::loaders::RequestLoaders;
use crate::render::{render_event, EventView};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request shapes
// ---------------------------------------------------------------------------

/// The optional entry placement block. When absent, both fields default
/// from the injected clock; when present, both are applied together.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EventInfo {
    pub date: CalendarDate,
    pub time_of_day: TimeOfDay,
}

#[derive(Debug, Deserialize)]
pub struct ReactionInput {
    pub tags: Vec<String>,
    pub feeling: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackBehavior {
    pub child_id: DbId,
    pub tags: Vec<String>,
    pub reaction: Option<ReactionInput>,
    pub notes: Option<String>,
    pub info: Option<EventInfo>,
}

#[derive(Debug, Deserialize)]
pub struct TrackTagged {
    pub child_id: DbId,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub info: Option<EventInfo>,
}

#[derive(Debug, Deserialize)]
pub struct TrackSleep {
    pub child_id: DbId,
    pub bed_time: String,
    pub wake_up_time: String,
    #[serde(default)]
    pub incidents: Vec<String>,
    pub notes: Option<String>,
    pub info: Option<EventInfo>,
}

#[derive(Debug, Deserialize)]
pub struct TrackMedication {
    pub child_medication_id: DbId,
    pub notes: Option<String>,
    pub info: Option<EventInfo>,
}

#[derive(Debug, Deserialize)]
pub struct EditTagged {
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    pub info: Option<EventInfo>,
}

#[derive(Debug, Deserialize)]
pub struct EditSleep {
    pub bed_time: Option<String>,
    pub wake_up_time: Option<String>,
    pub incidents: Option<Vec<String>>,
    pub notes: Option<String>,
    pub info: Option<EventInfo>,
}

#[derive(Debug, Deserialize)]
pub struct EditMedication {
    pub notes: Option<String>,
    pub info: Option<EventInfo>,
}

#[derive(Debug, Serialize)]
pub struct DeletedEvent {
    pub id: DbId,
    pub deleted: bool,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Resolve requested tag names to catalog ids under the acting user's
/// enablement. Fails `Validation` on any unmatched or disabled name.
async fn resolve_named(
    state: &AppState,
    user: &User,
    kind: TagKind,
    names: &[String],
) -> Result<Vec<DbId>, AppError> {
    let candidates =
        TagRepo::find_enabled_by_names(&state.pool, kind, names, &user.disabled_tag_ids).await?;
    let resolved = resolve_tags(kind, names, candidates)?;
    Ok(resolved.into_iter().map(|t| t.id).collect())
}

async fn resolve_reaction(
    state: &AppState,
    user: &User,
    input: &ReactionInput,
) -> Result<Reaction, AppError> {
    let tag_ids = resolve_named(state, user, TagKind::Reaction, &input.tags).await?;
    let feeling_id = match input.feeling.as_deref() {
        Some(name) => {
            let requested = vec![name.to_string()];
            let candidates = TagRepo::find_enabled_by_names(
                &state.pool,
                TagKind::Feeling,
                &requested,
                &user.disabled_tag_ids,
            )
            .await?;
            resolve_tag_by_name(TagKind::Feeling, Some(name), candidates)?.map(|t| t.id)
        }
        None => None,
    };
    Ok(Reaction { tag_ids, feeling_id })
}

/// Ownership check for the target child. A child that exists but belongs
/// to another user fails identically to a missing one.
async fn require_owned_child(state: &AppState, user_id: DbId, child_id: DbId) -> AppResult<()> {
    ChildRepo::find_owned(&state.pool, child_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Child",
            id: child_id,
        }))?;
    Ok(())
}

/// Entry placement: the caller's `info` block verbatim, or clock defaults.
fn placement(state: &AppState, info: Option<EventInfo>) -> (CalendarDate, TimeOfDay) {
    match info {
        Some(info) => (info.date, info.time_of_day),
        None => (state.clock.today(), state.clock.time_of_day()),
    }
}

async fn insert_and_render(
    state: &AppState,
    child_id: DbId,
    notes: Option<String>,
    info: Option<EventInfo>,
    payload: EventPayload,
) -> AppResult<(StatusCode, Json<EventView>)> {
    let (entry_date, time_of_day) = placement(state, info);
    let event = EventRepo::insert(
        &state.pool,
        &CreateEvent {
            child_id,
            entry_date,
            time_of_day,
            tracked_at: state.clock.now(),
            notes,
            payload,
        },
    )
    .await?;

    let loaders = RequestLoaders::new(&state.pool);
    let view = render_event(&loaders, &event).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Fetch a live event owned by the caller.
async fn require_owned_event(state: &AppState, user_id: DbId, id: DbId) -> AppResult<Event> {
    EventRepo::find_active_owned(&state.pool, id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))
}

async fn apply_update(state: &AppState, id: DbId, update: UpdateEvent) -> AppResult<Json<EventView>> {
    let updated = EventRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))?;
    let loaders = RequestLoaders::new(&state.pool);
    let view = render_event(&loaders, &updated).await?;
    Ok(Json(view))
}

fn validate_clock(field: &'static str, value: &str) -> AppResult<()> {
    parse_clock_time(value).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Invalid {field}: expected HH:mm"
        )))
    })?;
    Ok(())
}

/// Reject edits whose variant endpoint disagrees with the stored event.
fn require_payload<'a, T, F>(event: &'a Event, extract: F, variant: &'static str) -> AppResult<T>
where
    F: FnOnce(&'a EventPayload) -> Option<T>,
{
    extract(&event.payload.0).ok_or_else(|| {
        AppError::BadRequest(format!("Event {} is not a {variant} event", event.id))
    })
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

/// POST /api/v1/events/behavior
pub async fn track_behavior(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<TrackBehavior>,
) -> AppResult<(StatusCode, Json<EventView>)> {
    let user = require_user(&state.pool, user_id).await?;
    require_owned_child(&state, user_id, input.child_id).await?;

    let tag_ids = resolve_named(&state, &user, TagKind::Behavior, &input.tags).await?;
    let reaction = match &input.reaction {
        Some(r) => Some(resolve_reaction(&state, &user, r).await?),
        None => None,
    };

    insert_and_render(
        &state,
        input.child_id,
        input.notes,
        input.info,
        EventPayload::Behavior { tag_ids, reaction },
    )
    .await
}

/// POST /api/v1/events/activity
pub async fn track_activity(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<TrackTagged>,
) -> AppResult<(StatusCode, Json<EventView>)> {
    let user = require_user(&state.pool, user_id).await?;
    require_owned_child(&state, user_id, input.child_id).await?;
    let tag_ids = resolve_named(&state, &user, TagKind::Activity, &input.tags).await?;
    insert_and_render(
        &state,
        input.child_id,
        input.notes,
        input.info,
        EventPayload::Activity { tag_ids },
    )
    .await
}

/// POST /api/v1/events/therapy
pub async fn track_therapy(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<TrackTagged>,
) -> AppResult<(StatusCode, Json<EventView>)> {
    let user = require_user(&state.pool, user_id).await?;
    require_owned_child(&state, user_id, input.child_id).await?;
    let tag_ids = resolve_named(&state, &user, TagKind::Therapy, &input.tags).await?;
    insert_and_render(
        &state,
        input.child_id,
        input.notes,
        input.info,
        EventPayload::Therapy { tag_ids },
    )
    .await
}

/// POST /api/v1/events/sleep
pub async fn track_sleep(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<TrackSleep>,
) -> AppResult<(StatusCode, Json<EventView>)> {
    let user = require_user(&state.pool, user_id).await?;
    require_owned_child(&state, user_id, input.child_id).await?;

    validate_clock("bed_time", &input.bed_time)?;
    validate_clock("wake_up_time", &input.wake_up_time)?;
    let incident_ids = resolve_named(&state, &user, TagKind::Sleep, &input.incidents).await?;

    insert_and_render(
        &state,
        input.child_id,
        input.notes,
        input.info,
        EventPayload::Sleep {
            bed_time: input.bed_time,
            wake_up_time: input.wake_up_time,
            incident_ids,
        },
    )
    .await
}

/// POST /api/v1/events/medication
pub async fn track_medication(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<TrackMedication>,
) -> AppResult<(StatusCode, Json<EventView>)> {
    let schedule =
        ChildMedicationRepo::find_owned(&state.pool, input.child_medication_id, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Medication schedule",
                id: input.child_medication_id,
            }))?;

    insert_and_render(
        &state,
        schedule.child_id,
        input.notes,
        input.info,
        EventPayload::Medication {
            child_medication_id: schedule.id,
        },
    )
    .await
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// PATCH /api/v1/events/{id}/behavior
pub async fn edit_behavior(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<EditTagged>,
) -> AppResult<Json<EventView>> {
    let user = require_user(&state.pool, user_id).await?;
    let event = require_owned_event(&state, user_id, id).await?;
    let reaction = require_payload(
        &event,
        |p| match p {
            EventPayload::Behavior { reaction, .. } => Some(reaction.clone()),
            _ => None,
        },
        "behavior",
    )?;

    let payload = match &input.tags {
        Some(names) => Some(EventPayload::Behavior {
            tag_ids: resolve_named(&state, &user, TagKind::Behavior, names).await?,
            reaction,
        }),
        None => None,
    };

    apply_update(
        &state,
        id,
        UpdateEvent {
            entry_date: input.info.map(|i| i.date),
            time_of_day: input.info.map(|i| i.time_of_day),
            notes: input.notes,
            payload,
        },
    )
    .await
}

/// PATCH /api/v1/events/{id}/activity
pub async fn edit_activity(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<EditTagged>,
) -> AppResult<Json<EventView>> {
    let user = require_user(&state.pool, user_id).await?;
    let event = require_owned_event(&state, user_id, id).await?;
    require_payload(
        &event,
        |p| match p {
            EventPayload::Activity { .. } => Some(()),
            _ => None,
        },
        "activity",
    )?;

    let payload = match &input.tags {
        Some(names) => Some(EventPayload::Activity {
            tag_ids: resolve_named(&state, &user, TagKind::Activity, names).await?,
        }),
        None => None,
    };

    apply_update(
        &state,
        id,
        UpdateEvent {
            entry_date: input.info.map(|i| i.date),
            time_of_day: input.info.map(|i| i.time_of_day),
            notes: input.notes,
            payload,
        },
    )
    .await
}

/// PATCH /api/v1/events/{id}/therapy
pub async fn edit_therapy(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<EditTagged>,
) -> AppResult<Json<EventView>> {
    let user = require_user(&state.pool, user_id).await?;
    let event = require_owned_event(&state, user_id, id).await?;
    require_payload(
        &event,
        |p| match p {
            EventPayload::Therapy { .. } => Some(()),
            _ => None,
        },
        "therapy",
    )?;

    let payload = match &input.tags {
        Some(names) => Some(EventPayload::Therapy {
            tag_ids: resolve_named(&state, &user, TagKind::Therapy, names).await?,
        }),
        None => None,
    };

    apply_update(
        &state,
        id,
        UpdateEvent {
            entry_date: input.info.map(|i| i.date),
            time_of_day: input.info.map(|i| i.time_of_day),
            notes: input.notes,
            payload,
        },
    )
    .await
}

/// PATCH /api/v1/events/{id}/sleep
pub async fn edit_sleep(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<EditSleep>,
) -> AppResult<Json<EventView>> {
    let user = require_user(&state.pool, user_id).await?;
    let event = require_owned_event(&state, user_id, id).await?;
    let (bed_time, wake_up_time, incident_ids) = require_payload(
        &event,
        |p| match p {
            EventPayload::Sleep {
                bed_time,
                wake_up_time,
                incident_ids,
            } => Some((bed_time.clone(), wake_up_time.clone(), incident_ids.clone())),
            _ => None,
        },
        "sleep",
    )?;

    if let Some(value) = &input.bed_time {
        validate_clock("bed_time", value)?;
    }
    if let Some(value) = &input.wake_up_time {
        validate_clock("wake_up_time", value)?;
    }

    // Merge supplied fields over the stored payload; untouched fields carry.
    let payload = if input.bed_time.is_some()
        || input.wake_up_time.is_some()
        || input.incidents.is_some()
    {
        let incident_ids = match &input.incidents {
            Some(names) => resolve_named(&state, &user, TagKind::Sleep, names).await?,
            None => incident_ids,
        };
        Some(EventPayload::Sleep {
            bed_time: input.bed_time.unwrap_or(bed_time),
            wake_up_time: input.wake_up_time.unwrap_or(wake_up_time),
            incident_ids,
        })
    } else {
        None
    };

    apply_update(
        &state,
        id,
        UpdateEvent {
            entry_date: input.info.map(|i| i.date),
            time_of_day: input.info.map(|i| i.time_of_day),
            notes: input.notes,
            payload,
        },
    )
    .await
}

/// PATCH /api/v1/events/{id}/medication
pub async fn edit_medication(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<EditMedication>,
) -> AppResult<Json<EventView>> {
    let event = require_owned_event(&state, user_id, id).await?;
    require_payload(
        &event,
        |p| match p {
            EventPayload::Medication { .. } => Some(()),
            _ => None,
        },
        "medication",
    )?;

    apply_update(
        &state,
        id,
        UpdateEvent {
            entry_date: input.info.map(|i| i.date),
            time_of_day: input.info.map(|i| i.time_of_day),
            notes: input.notes,
            payload: None,
        },
    )
    .await
}

// ---------------------------------------------------------------------------
// Reaction / delete
// ---------------------------------------------------------------------------

/// POST /api/v1/events/{id}/reaction
///
/// Attach or replace a behavior event's reaction block.
pub async fn set_reaction(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReactionInput>,
) -> AppResult<Json<EventView>> {
    let user = require_user(&state.pool, user_id).await?;
    let event = require_owned_event(&state, user_id, id).await?;
    let tag_ids = require_payload(
        &event,
        |p| match p {
            EventPayload::Behavior { tag_ids, .. } => Some(tag_ids.clone()),
            _ => None,
        },
        "behavior",
    )?;

    let reaction = resolve_reaction(&state, &user, &input).await?;

    apply_update(
        &state,
        id,
        UpdateEvent {
            payload: Some(EventPayload::Behavior {
                tag_ids,
                reaction: Some(reaction),
            }),
            ..UpdateEvent::default()
        },
    )
    .await
}

/// DELETE /api/v1/events/{id}
///
/// Soft delete: the row stays but becomes invisible to every read.
/// Irreversible through the API.
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedEvent>> {
    require_owned_event(&state, user_id, id).await?;
    let deleted = EventRepo::soft_delete(&state.pool, id).await?;
    Ok(Json(DeletedEvent { id, deleted }))
}
