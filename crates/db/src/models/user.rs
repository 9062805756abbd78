//! User entity model.
//!
//! Only the aspects this service owns are modeled: identity plus the
//! per-user tag disablement set. Credentials and PII encryption belong to
//! the out-of-scope auth layer.

use nestling_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    /// Catalog tags hidden from this user's resolution and listing
    /// results. Empty by default.
    pub disabled_tag_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
}
