//! Route definitions for event tracking, edits, and deletion.

use axum::routing::{delete, patch, post};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// POST   /behavior          -> track_behavior
/// POST   /activity          -> track_activity
/// POST   /therapy           -> track_therapy
/// POST   /sleep             -> track_sleep
/// POST   /medication        -> track_medication
/// PATCH  /{id}/behavior     -> edit_behavior
/// PATCH  /{id}/activity     -> edit_activity
/// PATCH  /{id}/therapy      -> edit_therapy
/// PATCH  /{id}/sleep        -> edit_sleep
/// PATCH  /{id}/medication   -> edit_medication
/// POST   /{id}/reaction     -> set_reaction
/// DELETE /{id}              -> delete (soft)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/behavior", post(events::track_behavior))
        .route("/activity", post(events::track_activity))
        .route("/therapy", post(events::track_therapy))
        .route("/sleep", post(events::track_sleep))
        .route("/medication", post(events::track_medication))
        .route("/{id}/behavior", patch(events::edit_behavior))
        .route("/{id}/activity", patch(events::edit_activity))
        .route("/{id}/therapy", patch(events::edit_therapy))
        .route("/{id}/sleep", patch(events::edit_sleep))
        .route("/{id}/medication", patch(events::edit_medication))
        .route("/{id}/reaction", post(events::set_reaction))
        .route("/{id}", delete(events::delete))
}
