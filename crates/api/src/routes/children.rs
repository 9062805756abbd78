//! Route definitions for children and their medication schedules.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{child_medications, children};
use crate::state::AppState;

/// Routes mounted at `/children`.
///
/// ```text
/// GET    /                              -> list
/// POST   /                              -> create
/// GET    /{child_id}/medications        -> child_medications::list
/// POST   /{child_id}/medications        -> child_medications::create
/// DELETE /{child_id}/medications/{id}   -> child_medications::delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(children::list).post(children::create))
        .route(
            "/{child_id}/medications",
            get(child_medications::list).post(child_medications::create),
        )
        .route(
            "/{child_id}/medications/{id}",
            delete(child_medications::delete),
        )
}
