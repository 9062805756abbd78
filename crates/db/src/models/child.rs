//! Child entity model.

use nestling_core::types::{CalendarDate, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `children` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Child {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub date_of_birth: Option<CalendarDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new child.
#[derive(Debug, Deserialize)]
pub struct CreateChild {
    pub name: String,
    pub date_of_birth: Option<CalendarDate>,
}
