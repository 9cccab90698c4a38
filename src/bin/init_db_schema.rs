use dotenvy::dotenv;
use eyre::{Result, WrapErr};
use tracing::info;

use set_stats::config;
use set_stats::db::{connection, schema};
use set_stats::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; plain environment variables work too
    dotenv().ok();

    // --dry-run prints the DDL without touching the database
    if std::env::args().skip(1).any(|arg| arg == "--dry-run") {
        for statement in schema::schema_model().ddl_statements() {
            println!("{statement}\n");
        }
        return Ok(());
    }

    logging::init_logging(env!("CARGO_BIN_NAME"))?;

    let cfg = config::Config::load()?;
    info!(max_connections = cfg.max_connections, "Configuration loaded and logging initialized");

    let pool = connection::create_pool(&cfg)
        .await
        .wrap_err("Failed to connect to database")?;
    info!("Database connection pool created");

    schema::init_schema(&pool)
        .await
        .wrap_err("Failed to initialize schema")?;
    info!("Database schema initialized");

    pool.close().await;
    Ok(())
}
