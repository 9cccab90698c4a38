use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::DbError;

/// Digits after the decimal point in `training_cycles.rounding_factor`
pub const ROUNDING_FACTOR_SCALE: u32 = 2;

/// A rounding factor that fits `NUMERIC(4, 2)`.
///
/// Extra fractional digits are rounded half away from zero, which is what
/// PostgreSQL does on insert, so the value held here is the value that will
/// be read back. Anything that still needs a third integer digit is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct RoundingFactor(Decimal);

impl RoundingFactor {
    pub fn new(value: Decimal) -> Result<Self, DbError> {
        let mut rounded = value.round_dp_with_strategy(
            ROUNDING_FACTOR_SCALE,
            RoundingStrategy::MidpointAwayFromZero,
        );
        if rounded.abs() >= Decimal::ONE_HUNDRED {
            return Err(DbError::numeric_overflow(value));
        }
        rounded.rescale(ROUNDING_FACTOR_SCALE);
        Ok(Self(rounded))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for RoundingFactor {
    type Error = DbError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoundingFactor> for Decimal {
    fn from(factor: RoundingFactor) -> Self {
        factor.0
    }
}

impl std::fmt::Display for RoundingFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainingCycleModel {
    pub id: i32,
    pub user_id: i32,
    pub cycle_number: i32,
    pub rounding_factor: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTrainingCycleModel {
    pub user_id: i32,
    pub cycle_number: i32,
    pub rounding_factor: RoundingFactor,
}

impl NewTrainingCycleModel {
    pub fn new(user_id: i32, cycle_number: i32, rounding_factor: RoundingFactor) -> Self {
        Self {
            user_id,
            cycle_number,
            rounding_factor,
        }
    }
}
