//! Repository for the `tags` table (global catalog).
//!
//! Catalog order is ascending `sort_order` with ties broken by `name`;
//! every listing query bakes that in so callers never re-sort. Queries
//! that feed tag resolution exclude the acting user's disabled tags in
//! SQL -- from the resolution engine's point of view a disabled tag does
//! not exist. `find_by_ids` deliberately skips the disablement filter:
//! historical events keep rendering tags that were enabled at write time.

use nestling_core::types::{DbId, TagKind};
use sqlx::PgPool;

use crate::models::tag::{CreateTag, Tag};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, kind, name, group_name, sort_order, created_at";

/// Provides catalog queries for tags.
pub struct TagRepo;

impl TagRepo {
    /// Insert a catalog tag, returning the created row. Fails on a
    /// duplicate `(kind, name)` pair.
    pub async fn create(pool: &PgPool, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (kind, name, group_name, sort_order)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(input.kind.code())
            .bind(&input.name)
            .bind(&input.group_name)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// List catalog tags of a kind, optionally filtered by group,
    /// excluding the given disabled set. Catalog order.
    pub async fn list(
        pool: &PgPool,
        kind: TagKind,
        group: Option<&str>,
        disabled_tag_ids: &[DbId],
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tags
             WHERE kind = $1
               AND ($2::text IS NULL OR group_name = $2)
               AND NOT (id = ANY($3))
             ORDER BY sort_order ASC, name ASC"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(kind.code())
            .bind(group)
            .bind(disabled_tag_ids)
            .fetch_all(pool)
            .await
    }

    /// Enabled catalog candidates for tag resolution: tags of `kind`
    /// whose name is in `names`, minus the disabled set. Catalog order.
    pub async fn find_enabled_by_names(
        pool: &PgPool,
        kind: TagKind,
        names: &[String],
        disabled_tag_ids: &[DbId],
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tags
             WHERE kind = $1
               AND name = ANY($2)
               AND NOT (id = ANY($3))
             ORDER BY sort_order ASC, name ASC"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(kind.code())
            .bind(names)
            .bind(disabled_tag_ids)
            .fetch_all(pool)
            .await
    }

    /// Batch lookup by IDs for the request loaders. No disablement
    /// filter and no kind filter: stored references render as written.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = ANY($1)");
        sqlx::query_as::<_, Tag>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
