//! Route definition for the merged timeline feed.

use axum::routing::get;
use axum::Router;

use crate::handlers::timeline;
use crate::state::AppState;

/// `GET /timeline` -- the merged event feed with boundary flags.
pub fn router() -> Router<AppState> {
    Router::new().route("/timeline", get(timeline::get_timeline))
}
