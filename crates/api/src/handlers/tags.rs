//! Handlers for the `/tags` resource: catalog listing and per-user
//! disablement.

use axum::extract::{Path, Query, State};
use axum::Json;
use nestling_core::error::CoreError;
use nestling_core::types::{DbId, TagKind};
use nestling_db::models::tag::Tag;
use nestling_db::repositories::{TagRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::{require_user, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListTagsQuery {
    pub kind: TagKind,
    pub group: Option<String>,
}

/// GET /api/v1/tags?kind=&group=
///
/// Catalog order; the acting user's disabled tags are excluded.
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ListTagsQuery>,
) -> AppResult<Json<Vec<Tag>>> {
    let user = require_user(&state.pool, user_id).await?;
    let tags = TagRepo::list(
        &state.pool,
        query.kind,
        query.group.as_deref(),
        &user.disabled_tag_ids,
    )
    .await?;
    Ok(Json(tags))
}

#[derive(Debug, Deserialize)]
pub struct SetDisabledBody {
    pub disabled: bool,
}

#[derive(Debug, Serialize)]
pub struct TagDisablement {
    pub tag_id: DbId,
    pub disabled: bool,
}

/// PUT /api/v1/tags/{id}/disabled
///
/// Toggle the tag in the acting user's disablement set. Idempotent, and
/// never retroactive: events that already reference the tag keep it.
pub async fn set_disabled(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<DbId>,
    Json(body): Json<SetDisabledBody>,
) -> AppResult<Json<TagDisablement>> {
    let found: Vec<Tag> = TagRepo::find_by_ids(&state.pool, &[id]).await?;
    if found.is_empty() {
        return Err(AppError::Core(CoreError::NotFound { entity: "Tag", id }));
    }

    let updated = if body.disabled {
        UserRepo::disable_tag(&state.pool, user_id, id).await?
    } else {
        UserRepo::enable_tag(&state.pool, user_id, id).await?
    };
    updated.ok_or_else(|| AppError::Unauthorized(format!("Unknown user {user_id}")))?;

    Ok(Json(TagDisablement {
        tag_id: id,
        disabled: body.disabled,
    }))
}
