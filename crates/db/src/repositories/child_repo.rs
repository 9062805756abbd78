//! Repository for the `children` table.
//!
//! All by-id lookups are ownership-scoped: a child that exists but
//! belongs to another user is reported exactly like a missing row, so
//! existence never leaks across tenants.

use nestling_core::types::DbId;
use sqlx::PgPool;

use crate::models::child::{Child, CreateChild};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, date_of_birth, created_at, updated_at";

/// Provides CRUD operations for children.
pub struct ChildRepo;

impl ChildRepo {
    /// Insert a new child for the given owner, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateChild,
    ) -> Result<Child, sqlx::Error> {
        let query = format!(
            "INSERT INTO children (user_id, name, date_of_birth)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Child>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(input.date_of_birth)
            .fetch_one(pool)
            .await
    }

    /// Find a child by ID, scoped to its owner. Returns `None` both when
    /// the child does not exist and when it belongs to someone else.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Child>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM children WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Child>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List all children owned by a user, oldest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Child>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM children WHERE user_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Child>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// IDs of all children owned by a user. The timeline aggregator's
    /// child-set resolution.
    pub async fn ids_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM children WHERE user_id = $1 ORDER BY id")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
