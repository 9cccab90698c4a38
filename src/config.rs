use dotenvy::dotenv;
use eyre::{Result, WrapErr};
use std::env;
use std::time::Duration;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_SLOW_STATEMENT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    /// Statements running longer than this are logged at WARN by sqlx
    pub slow_statement_threshold: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").wrap_err("Missing DATABASE_URL")?;

        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse::<u32>()
                .wrap_err_with(|| format!("Invalid DB_MAX_CONNECTIONS value: {raw}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let slow_statement_secs = match env::var("DB_SLOW_STATEMENT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .wrap_err_with(|| format!("Invalid DB_SLOW_STATEMENT_SECS value: {raw}"))?,
            Err(_) => DEFAULT_SLOW_STATEMENT_SECS,
        };

        Ok(Config {
            database_url,
            max_connections,
            slow_statement_threshold: Duration::from_secs(slow_statement_secs),
        })
    }

    /// Config pointing at `database_url` with default pool settings
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Config {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            slow_statement_threshold: Duration::from_secs(DEFAULT_SLOW_STATEMENT_SECS),
        }
    }
}
