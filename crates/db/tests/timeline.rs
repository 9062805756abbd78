//! Integration tests for the timeline window query and boundary probes.

use chrono::{NaiveDate, TimeZone, Utc};
use sqlx::PgPool;

use nestling_core::timeline::{self, TimelineWindow};
use nestling_core::types::{DbId, TimeOfDay};
use nestling_db::models::child::CreateChild;
use nestling_db::models::event::{CreateEvent, EventPayload};
use nestling_db::models::user::CreateUser;
use nestling_db::repositories::{ChildRepo, EventRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_child(pool: &PgPool, email: &str) -> (DbId, DbId) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: "Test Parent".to_string(),
        },
    )
    .await
    .unwrap();
    let child = ChildRepo::create(
        pool,
        user.id,
        &CreateChild {
            name: "Sam".to_string(),
            date_of_birth: None,
        },
    )
    .await
    .unwrap();
    (user.id, child.id)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 6, d).unwrap()
}

async fn track(pool: &PgPool, child_id: DbId, d: u32, tod: TimeOfDay, secs: u32) -> DbId {
    let event = EventRepo::insert(
        pool,
        &CreateEvent {
            child_id,
            entry_date: day(d),
            time_of_day: tod,
            tracked_at: Utc.with_ymd_and_hms(2021, 6, d, 12, 0, secs).unwrap(),
            notes: None,
            payload: EventPayload::Activity { tag_ids: vec![] },
        },
    )
    .await
    .unwrap();
    event.id
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn timeline_orders_by_date_time_of_day_then_tracked_at(pool: PgPool) {
    let (_, child_id) = seed_child(&pool, "order@test.dev").await;

    // Insert out of order on purpose.
    let d28_morning = track(&pool, child_id, 28, TimeOfDay::Morning, 0).await;
    let d27_evening = track(&pool, child_id, 27, TimeOfDay::Evening, 0).await;
    let d27_morning_late = track(&pool, child_id, 27, TimeOfDay::Morning, 30).await;
    let d27_morning_early = track(&pool, child_id, 27, TimeOfDay::Morning, 10).await;

    let events = EventRepo::timeline(&pool, &[child_id], TimelineWindow::default())
        .await
        .unwrap();

    let ids: Vec<DbId> = events.iter().map(|e| e.id).collect();
    assert_eq!(
        ids,
        vec![d27_morning_early, d27_morning_late, d27_evening, d28_morning]
    );
    assert!(timeline::is_ordered(&events));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn timeline_merges_children_of_the_same_owner(pool: PgPool) {
    let (user_id, first_child) = seed_child(&pool, "merge@test.dev").await;
    let second_child = ChildRepo::create(
        &pool,
        user_id,
        &CreateChild {
            name: "Robin".to_string(),
            date_of_birth: None,
        },
    )
    .await
    .unwrap()
    .id;

    track(&pool, first_child, 27, TimeOfDay::Morning, 0).await;
    track(&pool, second_child, 27, TimeOfDay::Afternoon, 0).await;

    let child_ids = ChildRepo::ids_for_user(&pool, user_id).await.unwrap();
    let events = EventRepo::timeline(&pool, &child_ids, TimelineWindow::default())
        .await
        .unwrap();
    assert_eq!(events.len(), 2);
    assert!(timeline::is_ordered(&events));
}

// ---------------------------------------------------------------------------
// Window bounds
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn window_bounds_are_inclusive(pool: PgPool) {
    let (_, child_id) = seed_child(&pool, "bounds@test.dev").await;
    track(&pool, child_id, 26, TimeOfDay::Morning, 0).await;
    track(&pool, child_id, 27, TimeOfDay::Morning, 0).await;
    track(&pool, child_id, 28, TimeOfDay::Morning, 0).await;

    let single_day = TimelineWindow::new(Some(day(27)), Some(day(27)));
    let events = EventRepo::timeline(&pool, &[child_id], single_day).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].entry_date, day(27));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inverted_window_returns_empty_without_error(pool: PgPool) {
    let (_, child_id) = seed_child(&pool, "inverted@test.dev").await;
    track(&pool, child_id, 27, TimeOfDay::Morning, 0).await;

    let inverted = TimelineWindow::new(Some(day(28)), Some(day(26)));
    let events = EventRepo::timeline(&pool, &[child_id], inverted).await.unwrap();
    assert!(events.is_empty());
}

// ---------------------------------------------------------------------------
// Boundary probes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn boundary_probes_detect_events_outside_the_window(pool: PgPool) {
    let (_, child_id) = seed_child(&pool, "probe@test.dev").await;
    track(&pool, child_id, 27, TimeOfDay::Morning, 0).await;
    track(&pool, child_id, 28, TimeOfDay::Morning, 0).await;

    // from = 28: the 27th lies strictly before.
    assert!(EventRepo::exists_before(&pool, &[child_id], day(28)).await.unwrap());
    // Nothing after the 28th.
    assert!(!EventRepo::exists_after(&pool, &[child_id], day(28)).await.unwrap());
    // The boundary day itself does not count as "before" it.
    assert!(!EventRepo::exists_before(&pool, &[child_id], day(27)).await.unwrap());
    // But it counts as "after" the 26th.
    assert!(EventRepo::exists_after(&pool, &[child_id], day(26)).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn probes_only_see_the_given_children(pool: PgPool) {
    let (_, mine) = seed_child(&pool, "mine@test.dev").await;
    let (_, theirs) = seed_child(&pool, "theirs@test.dev").await;
    track(&pool, theirs, 1, TimeOfDay::Morning, 0).await;

    assert!(!EventRepo::exists_before(&pool, &[mine], day(28)).await.unwrap());
}
