//! Handlers for per-child medication schedules.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use nestling_core::error::CoreError;
use nestling_core::types::{parse_clock_time, DayOfWeek, DbId};
use nestling_db::models::child_medication::{ChildMedication, CreateChildMedication};
use nestling_db::repositories::{ChildMedicationRepo, ChildRepo, MedicationRepo};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateScheduleBody {
    /// Medication name; the catalog entry is created on first use.
    pub medication: String,
    pub dose: Option<String>,
    pub dose_amount: Option<String>,
    /// `"HH:mm"` intake window bounds.
    pub schedule_from: Option<String>,
    pub schedule_to: Option<String>,
    pub days: Vec<DayOfWeek>,
    #[serde(default)]
    pub send_reminder: bool,
}

async fn require_owned_child(state: &AppState, user_id: DbId, child_id: DbId) -> AppResult<()> {
    ChildRepo::find_owned(&state.pool, child_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Child",
            id: child_id,
        }))?;
    Ok(())
}

fn validate_clock(field: &'static str, value: Option<&str>) -> AppResult<()> {
    if let Some(value) = value {
        parse_clock_time(value).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Invalid {field}: expected HH:mm"
            )))
        })?;
    }
    Ok(())
}

/// POST /api/v1/children/{child_id}/medications
///
/// Creates the medication catalog entry on first use, then the schedule.
/// A second schedule for the same medication that shares any day is a
/// conflict, as is an exact duplicate pair (unique constraint).
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(child_id): Path<DbId>,
    Json(body): Json<CreateScheduleBody>,
) -> AppResult<(StatusCode, Json<ChildMedication>)> {
    require_owned_child(&state, user_id, child_id).await?;

    if body.medication.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Medication name must not be empty".into(),
        )));
    }
    if body.days.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Schedule must cover at least one day".into(),
        )));
    }
    validate_clock("schedule_from", body.schedule_from.as_deref())?;
    validate_clock("schedule_to", body.schedule_to.as_deref())?;

    let mut days: Vec<i16> = body.days.iter().map(|d| d.code()).collect();
    days.sort_unstable();
    days.dedup();

    let medication = MedicationRepo::find_or_create(&state.pool, body.medication.trim()).await?;

    if ChildMedicationRepo::overlapping_days_exist(&state.pool, child_id, medication.id, &days)
        .await?
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A schedule for {} already covers one of these days",
            medication.name
        ))));
    }

    let schedule = ChildMedicationRepo::create(
        &state.pool,
        &CreateChildMedication {
            child_id,
            medication_id: medication.id,
            dose: body.dose,
            dose_amount: body.dose_amount,
            schedule_from: body.schedule_from,
            schedule_to: body.schedule_to,
            days,
            send_reminder: body.send_reminder,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

/// GET /api/v1/children/{child_id}/medications
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(child_id): Path<DbId>,
) -> AppResult<Json<Vec<ChildMedication>>> {
    require_owned_child(&state, user_id, child_id).await?;
    let schedules = ChildMedicationRepo::list_for_child(&state.pool, child_id).await?;
    Ok(Json(schedules))
}

/// DELETE /api/v1/children/{child_id}/medications/{id}
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path((child_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_owned_child(&state, user_id, child_id).await?;
    let schedule = ChildMedicationRepo::find_owned(&state.pool, id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Medication schedule",
            id,
        }))?;
    if schedule.child_id != child_id {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Medication schedule",
            id,
        }));
    }

    ChildMedicationRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
