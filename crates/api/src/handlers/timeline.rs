//! Handler for the merged event timeline.
//!
//! Resolves the caller's child set, runs the window query and the two
//! boundary probes concurrently, then renders the page through the
//! request's batch loaders so reference resolution stays one query per
//! repository no matter how many events the page holds.

use axum::extract::{Query, State};
use axum::Json;
use nestling_core::timeline::{TimelinePage, TimelineWindow};
use nestling_core::types::CalendarDate;
use nestling_db::repositories::{ChildRepo, EventRepo};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::loaders::RequestLoaders;
use crate::render::{render_events, EventView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    pub from: Option<CalendarDate>,
    pub to: Option<CalendarDate>,
}

/// GET /api/v1/timeline?from=&to=
///
/// Bounds are inclusive and each is optional; an inverted window yields an
/// empty feed. Each boundary flag is present exactly when its bound was
/// supplied. An owner with no children short-circuits to the empty page
/// with both flags unknown.
pub async fn get_timeline(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<TimelineQuery>,
) -> AppResult<Json<TimelinePage<EventView>>> {
    let child_ids = ChildRepo::ids_for_user(&state.pool, user_id).await?;
    if child_ids.is_empty() {
        return Ok(Json(TimelinePage::empty()));
    }

    let window = TimelineWindow::new(query.from, query.to);

    let (events, has_events_before, has_events_after) = tokio::try_join!(
        EventRepo::timeline(&state.pool, &child_ids, window),
        async {
            match window.from {
                Some(from) => EventRepo::exists_before(&state.pool, &child_ids, from)
                    .await
                    .map(Some),
                None => Ok(None),
            }
        },
        async {
            match window.to {
                Some(to) => EventRepo::exists_after(&state.pool, &child_ids, to)
                    .await
                    .map(Some),
                None => Ok(None),
            }
        },
    )?;

    let loaders = RequestLoaders::new(&state.pool);
    let events = render_events(&loaders, &events).await?;

    Ok(Json(TimelinePage {
        events,
        has_events_before,
        has_events_after,
    }))
}
