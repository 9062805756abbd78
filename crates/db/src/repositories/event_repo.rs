//! Repository for the polymorphic `events` table.
//!
//! Events are never hard-deleted: `soft_delete` flips `is_deleted` and
//! every read here -- the by-id lookup, the timeline window query, both
//! boundary probes -- filters deleted rows, so a soft-deleted event is
//! indistinguishable from one that never existed.
//!
//! The timeline query orders by `(entry_date, time_of_day, tracked_at)`,
//! the deterministic total order shared with
//! [`nestling_core::timeline::compare`]. Boundary presence is an EXISTS
//! probe, never a count: it answers "is there anything outside the
//! window" without materializing rows.

use nestling_core::timeline::TimelineWindow;
use nestling_core::types::{CalendarDate, DbId};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::event::{CreateEvent, Event, UpdateEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, child_id, kind, entry_date, time_of_day, tracked_at, \
    notes, is_deleted, payload, created_at, updated_at";

/// Qualified column list for queries that join `children`.
const QUALIFIED_COLUMNS: &str = "e.id, e.child_id, e.kind, e.entry_date, e.time_of_day, \
    e.tracked_at, e.notes, e.is_deleted, e.payload, e.created_at, e.updated_at";

/// Provides lifecycle operations and timeline queries for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row. The discriminator
    /// column is derived from the payload, so the two can never disagree.
    pub async fn insert(pool: &PgPool, input: &CreateEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (child_id, kind, entry_date, time_of_day, tracked_at, notes, payload)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(input.child_id)
            .bind(input.payload.kind().code())
            .bind(input.entry_date)
            .bind(input.time_of_day.code())
            .bind(input.tracked_at)
            .bind(&input.notes)
            .bind(Json(&input.payload))
            .fetch_one(pool)
            .await
    }

    /// Find a non-deleted event by ID, scoped to the owner of its child.
    /// Returns `None` for missing rows, soft-deleted rows, and rows whose
    /// child belongs to another user alike.
    pub async fn find_active_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS} FROM events e
             JOIN children c ON c.id = e.child_id
             WHERE e.id = $1 AND c.user_id = $2 AND e.is_deleted = FALSE"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update to a non-deleted event. Only `Some` fields
    /// are overwritten; the caller guarantees `entry_date`/`time_of_day`
    /// travel together.
    ///
    /// Returns `None` if the row is missing or soft-deleted.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                entry_date = COALESCE($2, entry_date),
                time_of_day = COALESCE($3, time_of_day),
                notes = COALESCE($4, notes),
                payload = COALESCE($5, payload),
                updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(input.entry_date)
            .bind(input.time_of_day.map(|t| t.code()))
            .bind(&input.notes)
            .bind(input.payload.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an event. Returns `true` if a live row was marked;
    /// idempotent thereafter.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE events SET is_deleted = TRUE, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Non-deleted events for the given children inside the (inclusive,
    /// half-optional) date window, in timeline order.
    pub async fn timeline(
        pool: &PgPool,
        child_ids: &[DbId],
        window: TimelineWindow,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE child_id = ANY($1)
               AND is_deleted = FALSE
               AND ($2::date IS NULL OR entry_date >= $2)
               AND ($3::date IS NULL OR entry_date <= $3)
             ORDER BY entry_date ASC, time_of_day ASC, tracked_at ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(child_ids)
            .bind(window.from)
            .bind(window.to)
            .fetch_all(pool)
            .await
    }

    /// Existence probe: any non-deleted event for these children strictly
    /// before `date`?
    pub async fn exists_before(
        pool: &PgPool,
        child_ids: &[DbId],
        date: CalendarDate,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM events
                 WHERE child_id = ANY($1) AND is_deleted = FALSE AND entry_date < $2
             )",
        )
        .bind(child_ids)
        .bind(date)
        .fetch_one(pool)
        .await
    }

    /// Existence probe: any non-deleted event for these children strictly
    /// after `date`?
    pub async fn exists_after(
        pool: &PgPool,
        child_ids: &[DbId],
        date: CalendarDate,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM events
                 WHERE child_id = ANY($1) AND is_deleted = FALSE AND entry_date > $2
             )",
        )
        .bind(child_ids)
        .bind(date)
        .fetch_one(pool)
        .await
    }
}
