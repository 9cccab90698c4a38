use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::db::models::training_cycles::{NewTrainingCycleModel, TrainingCycleModel};
use crate::error::DbError;

/// Insert a cycle, returning its ID.
///
/// Fails with [`DbError::UniqueViolation`] when the user already has a cycle
/// with the same number.
#[instrument(skip(pool, cycle), fields(user_id = cycle.user_id, cycle_number = cycle.cycle_number))]
pub async fn insert_training_cycle(
    pool: &PgPool,
    cycle: &NewTrainingCycleModel,
) -> Result<i32, DbError> {
    let row = sqlx::query(
        r#"
        INSERT INTO training_cycles (user_id, cycle_number, rounding_factor)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(cycle.user_id)
    .bind(cycle.cycle_number)
    .bind(cycle.rounding_factor.value())
    .fetch_one(pool)
    .await
    .map_err(DbError::classify)?;

    Ok(row.get("id"))
}

/// Fetch a cycle by its database ID
pub async fn get_training_cycle_by_id(
    pool: &PgPool,
    id: i32,
) -> Result<Option<TrainingCycleModel>, sqlx::Error> {
    sqlx::query_as::<_, TrainingCycleModel>(
        r#"
        SELECT id, user_id, cycle_number, rounding_factor, created_at
        FROM training_cycles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Fetch a user's cycle by its number
pub async fn get_training_cycle(
    pool: &PgPool,
    user_id: i32,
    cycle_number: i32,
) -> Result<Option<TrainingCycleModel>, sqlx::Error> {
    sqlx::query_as::<_, TrainingCycleModel>(
        r#"
        SELECT id, user_id, cycle_number, rounding_factor, created_at
        FROM training_cycles
        WHERE user_id = $1 AND cycle_number = $2
        "#,
    )
    .bind(user_id)
    .bind(cycle_number)
    .fetch_optional(pool)
    .await
}

/// All cycles of a user, oldest cycle number first
pub async fn get_training_cycles_for_user(
    pool: &PgPool,
    user_id: i32,
) -> Result<Vec<TrainingCycleModel>, sqlx::Error> {
    sqlx::query_as::<_, TrainingCycleModel>(
        r#"
        SELECT id, user_id, cycle_number, rounding_factor, created_at
        FROM training_cycles
        WHERE user_id = $1
        ORDER BY cycle_number ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Highest cycle number recorded for a user, if any
pub async fn get_latest_cycle_number(
    pool: &PgPool,
    user_id: i32,
) -> Result<Option<i32>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT MAX(cycle_number) AS latest
        FROM training_cycles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    row.try_get::<Option<i32>, _>("latest")
}
