use rust_decimal::Decimal;
use thiserror::Error;

/// SQLSTATE for `unique_violation`
const PG_UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for `numeric_value_out_of_range`
const PG_NUMERIC_OUT_OF_RANGE: &str = "22003";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("unique constraint violated{}", .constraint.as_deref().map(|c| format!(": {c}")).unwrap_or_default())]
    UniqueViolation { constraint: Option<String> },

    #[error("numeric value out of range: {value}")]
    NumericOverflow { value: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Sorts a raw sqlx error into the storage-level failures callers care about
    pub fn classify(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => {
                    return DbError::UniqueViolation {
                        constraint: db_err.constraint().map(str::to_string),
                    };
                }
                Some(PG_NUMERIC_OUT_OF_RANGE) => {
                    return DbError::NumericOverflow {
                        value: db_err.message().to_string(),
                    };
                }
                _ => {}
            }
        }
        DbError::Sqlx(err)
    }

    pub fn numeric_overflow(value: Decimal) -> Self {
        DbError::NumericOverflow {
            value: value.to_string(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }
}
