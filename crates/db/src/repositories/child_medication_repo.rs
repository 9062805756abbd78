//! Repository for the `child_medications` schedule table.

use nestling_core::types::DbId;
use sqlx::PgPool;

use crate::models::child_medication::{ChildMedication, CreateChildMedication};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, child_id, medication_id, dose, dose_amount, \
    schedule_from, schedule_to, days, send_reminder, created_at, updated_at";

/// Provides CRUD operations for child medication schedules.
pub struct ChildMedicationRepo;

impl ChildMedicationRepo {
    /// Insert a new schedule, returning the created row. A duplicate
    /// `(child, medication)` pair violates
    /// `uq_child_medications_child_medication`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateChildMedication,
    ) -> Result<ChildMedication, sqlx::Error> {
        let query = format!(
            "INSERT INTO child_medications
                (child_id, medication_id, dose, dose_amount,
                 schedule_from, schedule_to, days, send_reminder)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChildMedication>(&query)
            .bind(input.child_id)
            .bind(input.medication_id)
            .bind(&input.dose)
            .bind(&input.dose_amount)
            .bind(&input.schedule_from)
            .bind(&input.schedule_to)
            .bind(&input.days)
            .bind(input.send_reminder)
            .fetch_one(pool)
            .await
    }

    /// Whether another schedule for the same child and medication shares
    /// any day with `days`. Used for the overlap conflict check.
    pub async fn overlapping_days_exist(
        pool: &PgPool,
        child_id: DbId,
        medication_id: DbId,
        days: &[i16],
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM child_medications
                 WHERE child_id = $1 AND medication_id = $2 AND days && $3
             )",
        )
        .bind(child_id)
        .bind(medication_id)
        .bind(days)
        .fetch_one(pool)
        .await
    }

    /// Find a schedule by ID, scoped to the owner of its child. Returns
    /// `None` both for missing rows and for schedules belonging to
    /// another user's child.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<ChildMedication>, sqlx::Error> {
        let query = "SELECT cm.id, cm.child_id, cm.medication_id, cm.dose, cm.dose_amount,
                    cm.schedule_from, cm.schedule_to, cm.days, cm.send_reminder,
                    cm.created_at, cm.updated_at
             FROM child_medications cm
             JOIN children c ON c.id = cm.child_id
             WHERE cm.id = $1 AND c.user_id = $2";
        sqlx::query_as::<_, ChildMedication>(query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all schedules for a child, oldest first.
    pub async fn list_for_child(
        pool: &PgPool,
        child_id: DbId,
    ) -> Result<Vec<ChildMedication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM child_medications
             WHERE child_id = $1
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, ChildMedication>(&query)
            .bind(child_id)
            .fetch_all(pool)
            .await
    }

    /// Batch lookup by IDs for the request loaders.
    pub async fn find_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<ChildMedication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM child_medications WHERE id = ANY($1)");
        sqlx::query_as::<_, ChildMedication>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Delete a schedule. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM child_medications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
