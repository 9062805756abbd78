//! Repository for the `users` table.

use nestling_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, display_name, disabled_tag_ids, created_at, updated_at";

/// Provides user lookup and per-user tag disablement.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Add a tag to the user's disablement set. Idempotent: disabling an
    /// already-disabled tag leaves the set unchanged.
    ///
    /// Returns `None` if no such user exists.
    pub async fn disable_tag(
        pool: &PgPool,
        user_id: DbId,
        tag_id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                disabled_tag_ids = CASE
                    WHEN $2 = ANY(disabled_tag_ids) THEN disabled_tag_ids
                    ELSE array_append(disabled_tag_ids, $2)
                END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(tag_id)
            .fetch_optional(pool)
            .await
    }

    /// Remove a tag from the user's disablement set. Idempotent.
    ///
    /// Returns `None` if no such user exists.
    pub async fn enable_tag(
        pool: &PgPool,
        user_id: DbId,
        tag_id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                disabled_tag_ids = array_remove(disabled_tag_ids, $2),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(tag_id)
            .fetch_optional(pool)
            .await
    }
}
