//! Runs against a live PostgreSQL database.
//!
//! `DATABASE_URL=postgres://... cargo test -- --ignored`

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::OnceCell;

use set_stats::config::Config;

use set_stats::db::db_manager::DbManager;
use set_stats::db::models::training_cycles::{NewTrainingCycleModel, RoundingFactor};
use set_stats::db::queries::training_cycles as queries;
use set_stats::error::DbError;

async fn setup() -> (DbManager, i32) {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let config = Config::with_database_url(url);
    let manager = DbManager::init(&config).await.expect("Failed to init database");

    // Each test works on its own user so runs don't interfere
    let user_id = fresh_user_id(&manager.pool).await;
    (manager, user_id)
}

// Read once per run: every test's user sits above all rows left by earlier runs
static USER_ID_BASE: OnceCell<i32> = OnceCell::const_new();
static NEXT_USER_OFFSET: AtomicI32 = AtomicI32::new(1);

async fn fresh_user_id(pool: &PgPool) -> i32 {
    let base = *USER_ID_BASE
        .get_or_init(|| async {
            let row: (Option<i32>,) =
                sqlx::query_as("SELECT MAX(user_id) FROM training_cycles")
                    .fetch_one(pool)
                    .await
                    .expect("Failed to query users");
            row.0.unwrap_or(0)
        })
        .await;
    base + NEXT_USER_OFFSET.fetch_add(1, Ordering::SeqCst)
}

fn factor(num: i64, scale: u32) -> RoundingFactor {
    RoundingFactor::new(Decimal::new(num, scale)).expect("valid rounding factor")
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn duplicate_cycle_number_is_rejected() {
    let (manager, user_id) = setup().await;

    manager.record_cycle(user_id, 1, factor(250, 2)).await.expect("first insert");
    let err = manager
        .record_cycle(user_id, 1, factor(500, 2))
        .await
        .expect_err("second insert must fail");

    assert!(err.is_unique_violation(), "unexpected error: {err}");
    match err {
        DbError::UniqueViolation { constraint } => {
            assert_eq!(constraint.as_deref(), Some("ix_training_cycles_user_id_cycle_number"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn different_cycle_numbers_both_persist() {
    let (manager, user_id) = setup().await;

    manager.record_cycle(user_id, 1, factor(250, 2)).await.expect("cycle 1");
    manager.record_cycle(user_id, 2, factor(250, 2)).await.expect("cycle 2");

    let cycles = manager.cycles_for_user(user_id).await.expect("list cycles");
    let numbers: Vec<i32> = cycles.iter().map(|c| c.cycle_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn rounding_factor_round_trips_at_scale_two() {
    let (manager, user_id) = setup().await;

    let exact = manager.record_cycle(user_id, 1, factor(1234, 2)).await.expect("12.34");
    let rounded = manager.record_cycle(user_id, 2, factor(12345, 3)).await.expect("12.345");

    let exact = queries::get_training_cycle_by_id(&manager.pool, exact)
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(exact.rounding_factor, Decimal::new(1234, 2));

    let rounded = queries::get_training_cycle_by_id(&manager.pool, rounded)
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(rounded.rounding_factor, Decimal::new(1235, 2));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn storage_rejects_out_of_range_values() {
    let (manager, user_id) = setup().await;

    // Bypass RoundingFactor to check the column itself
    let err = sqlx::query(
        "INSERT INTO training_cycles (user_id, cycle_number, rounding_factor) VALUES ($1, 1, $2)",
    )
    .bind(user_id)
    .bind(Decimal::new(12345, 2))
    .execute(&manager.pool)
    .await
    .map_err(DbError::classify)
    .expect_err("123.45 does not fit NUMERIC(4, 2)");

    assert!(matches!(err, DbError::NumericOverflow { .. }), "unexpected error: {err}");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn next_cycle_numbers_follow_the_latest() {
    let (manager, user_id) = setup().await;

    let first = manager.start_next_cycle(user_id, factor(100, 2)).await.expect("first");
    assert_eq!(first.cycle_number, 1);

    manager.record_cycle(user_id, 5, factor(100, 2)).await.expect("explicit 5");

    let next = manager.start_next_cycle(user_id, factor(100, 2)).await.expect("next");
    assert_eq!(next.cycle_number, 6);
    assert_eq!(
        queries::get_latest_cycle_number(&manager.pool, user_id).await.expect("latest"),
        Some(6)
    );

    let fetched = queries::get_training_cycle(&manager.pool, user_id, 6)
        .await
        .expect("query")
        .expect("row exists");
    assert_eq!(fetched.id, next.id);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn schema_init_is_repeatable() {
    let (manager, user_id) = setup().await;

    let new_cycle = NewTrainingCycleModel::new(user_id, 1, factor(75, 2));
    queries::insert_training_cycle(&manager.pool, &new_cycle).await.expect("insert");

    set_stats::db::schema::init_schema(&manager.pool).await.expect("second init");

    let cycles = manager.cycles_for_user(user_id).await.expect("list cycles");
    assert_eq!(cycles.len(), 1);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL pointing at a PostgreSQL instance"]
async fn next_cycle_after_max_number_overflows() {
    let (manager, user_id) = setup().await;

    manager
        .record_cycle(user_id, i32::MAX, factor(100, 2))
        .await
        .expect("i32::MAX is a valid cycle number");

    let err = manager
        .start_next_cycle(user_id, factor(100, 2))
        .await
        .expect_err("no cycle number after i32::MAX");
    assert!(matches!(err, DbError::NumericOverflow { .. }), "unexpected error: {err}");

    let cycles = manager.cycles_for_user(user_id).await.expect("list cycles");
    assert_eq!(cycles.len(), 1);
}
