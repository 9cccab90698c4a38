use sqlx::PgPool;
use tracing::info;

use super::connection;
use super::models::training_cycles::{NewTrainingCycleModel, RoundingFactor, TrainingCycleModel};
use super::queries::training_cycles as training_cycles_queries;
use super::schema;
use crate::config::Config;
use crate::error::DbError;

pub struct DbManager {
    pub pool: PgPool,
}

impl DbManager {
    /// Creates a new database connection and initializes the schema
    pub async fn init(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = connection::create_pool(config).await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, making sure the schema exists first
    pub async fn from_pool(pool: PgPool) -> Result<Self, sqlx::Error> {
        schema::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Stores a cycle with an explicit number. Returns the row ID.
    pub async fn record_cycle(
        &self,
        user_id: i32,
        cycle_number: i32,
        rounding_factor: RoundingFactor,
    ) -> Result<i32, DbError> {
        let new_cycle = NewTrainingCycleModel::new(user_id, cycle_number, rounding_factor);
        let id = training_cycles_queries::insert_training_cycle(&self.pool, &new_cycle).await?;
        info!(id, user_id, cycle_number, %rounding_factor, "Training cycle recorded");
        Ok(id)
    }

    /// Stores the user's next cycle, numbered one past their latest (or 1).
    ///
    /// Fails with [`DbError::NumericOverflow`] once the latest number is `i32::MAX`.
    /// Two callers racing for the same number both reach the unique index;
    /// the slower one gets [`DbError::UniqueViolation`].
    pub async fn start_next_cycle(
        &self,
        user_id: i32,
        rounding_factor: RoundingFactor,
    ) -> Result<TrainingCycleModel, DbError> {
        let latest = training_cycles_queries::get_latest_cycle_number(&self.pool, user_id).await?;
        let cycle_number = match latest {
            Some(n) => n.checked_add(1).ok_or_else(|| DbError::NumericOverflow {
                value: format!("cycle_number {n} + 1"),
            })?,
            None => 1,
        };

        let id = self.record_cycle(user_id, cycle_number, rounding_factor).await?;
        training_cycles_queries::get_training_cycle_by_id(&self.pool, id)
            .await?
            .ok_or(DbError::Sqlx(sqlx::Error::RowNotFound))
    }

    pub async fn cycles_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<TrainingCycleModel>, sqlx::Error> {
        training_cycles_queries::get_training_cycles_for_user(&self.pool, user_id).await
    }
}
