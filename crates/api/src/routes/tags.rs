//! Route definitions for the tag catalog.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/tags`.
///
/// ```text
/// GET /                 -> list (catalog order, user's disabled excluded)
/// PUT /{id}/disabled    -> set_disabled (per-user toggle)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list))
        .route("/{id}/disabled", put(tags::set_disabled))
}
