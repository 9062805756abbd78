pub mod children;
pub mod events;
pub mod health;
pub mod tags;
pub mod timeline;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /children                                 list, create
/// /children/{child_id}/medications          list, create schedule
/// /children/{child_id}/medications/{id}     delete schedule
///
/// /events/behavior                          track (POST)
/// /events/activity                          track (POST)
/// /events/therapy                           track (POST)
/// /events/sleep                             track (POST)
/// /events/medication                        track (POST)
/// /events/{id}/behavior                     edit (PATCH)
/// /events/{id}/activity                     edit (PATCH)
/// /events/{id}/therapy                      edit (PATCH)
/// /events/{id}/sleep                        edit (PATCH)
/// /events/{id}/medication                   edit (PATCH)
/// /events/{id}/reaction                     attach/replace reaction (POST)
/// /events/{id}                              soft delete (DELETE)
///
/// /timeline                                 merged feed with boundary flags
///
/// /tags                                     catalog listing (GET)
/// /tags/{id}/disabled                       per-user disablement (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/children", children::router())
        .nest("/events", events::router())
        .nest("/tags", tags::router())
        .merge(timeline::router())
}
