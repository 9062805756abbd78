//! Handlers for the `/children` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use nestling_db::models::child::{Child, CreateChild};
use nestling_db::repositories::ChildRepo;

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/children
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<CreateChild>,
) -> AppResult<(StatusCode, Json<Child>)> {
    let child = ChildRepo::create(&state.pool, user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(child)))
}

/// GET /api/v1/children
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<Vec<Child>>> {
    let children = ChildRepo::list_for_user(&state.pool, user_id).await?;
    Ok(Json(children))
}
