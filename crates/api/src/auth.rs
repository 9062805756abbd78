//! Caller-identity extractor for Axum handlers.
//!
//! Authentication proper (token issuance, session management) sits in front
//! of this service; by the time a request arrives here the gateway has
//! already verified the caller and stamped the internal user id into the
//! `x-user-id` header. The extractor only reads that header -- every
//! ownership decision still happens per query against the user's own rows.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use nestling_core::types::DbId;
use nestling_db::models::user::User;
use nestling_db::repositories::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, extracted from the `x-user-id` header.
///
/// Use this as an extractor parameter in any handler that acts on behalf
/// of a user:
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.0, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub DbId);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing x-user-id header".into()))?;

        let user_id: DbId = header
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid x-user-id header".into()))?;

        Ok(CurrentUser(user_id))
    }
}

/// Load the caller's user record, rejecting unknown ids.
///
/// Handlers that need the caller's disablement set (tag listing, tag
/// resolution) go through this; handlers that only scope queries by the
/// caller's id do not.
pub async fn require_user(pool: &nestling_db::DbPool, user_id: DbId) -> Result<User, AppError> {
    UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized(format!("Unknown user {user_id}")))
}
