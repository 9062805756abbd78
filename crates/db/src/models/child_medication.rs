//! Child medication schedule entity model.

use nestling_core::types::{DbId, DayOfWeek, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `child_medications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChildMedication {
    pub id: DbId,
    pub child_id: DbId,
    pub medication_id: DbId,
    pub dose: Option<String>,
    pub dose_amount: Option<String>,
    /// Start of the daily intake window, `"HH:mm"`.
    pub schedule_from: Option<String>,
    /// End of the daily intake window, `"HH:mm"`.
    pub schedule_to: Option<String>,
    /// Deduplicated, sorted day codes; see [`DayOfWeek::code`].
    pub days: Vec<i16>,
    pub send_reminder: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChildMedication {
    pub fn days(&self) -> Vec<DayOfWeek> {
        self.days.iter().filter_map(|&d| DayOfWeek::from_code(d)).collect()
    }
}

/// DTO for creating a schedule. `days` must already be deduplicated and
/// sorted (the handler normalizes caller input).
#[derive(Debug, Clone)]
pub struct CreateChildMedication {
    pub child_id: DbId,
    pub medication_id: DbId,
    pub dose: Option<String>,
    pub dose_amount: Option<String>,
    pub schedule_from: Option<String>,
    pub schedule_to: Option<String>,
    pub days: Vec<i16>,
    pub send_reminder: bool,
}
