//! Medication catalog entity model (simple name lookup).

use nestling_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `medications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Medication {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
