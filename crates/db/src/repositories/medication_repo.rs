//! Repository for the `medications` lookup table.

use nestling_core::types::DbId;
use sqlx::PgPool;

use crate::models::medication::Medication;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at";

/// Provides name lookup for the medication catalog.
pub struct MedicationRepo;

impl MedicationRepo {
    /// Find a medication by name, creating it if absent.
    pub async fn find_or_create(pool: &PgPool, name: &str) -> Result<Medication, sqlx::Error> {
        let query = format!(
            "INSERT INTO medications (name)
             VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Medication>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Batch lookup by IDs for the request loaders.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Medication>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM medications WHERE id = ANY($1)");
        sqlx::query_as::<_, Medication>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
