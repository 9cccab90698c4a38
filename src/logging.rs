// Centralized logging setup: console output always, JSON file output on demand
use eyre::{Result, WrapErr};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

const LOG_DIR: &str = "logs";

fn crate_filter(level: &str) -> EnvFilter {
    // Everything else stays at warn so sqlx chatter doesn't drown our own logs
    EnvFilter::try_new(format!("warn,set_stats={level}"))
        .unwrap_or_else(|_| EnvFilter::new("warn,set_stats=info"))
}

/// Installs the global subscriber.
///
/// Reads `CONSOLE_LOG_LEVEL`, `FILE_LOG_LEVEL` and `LOG_TO_FILE` from the
/// environment. `app_name` prefixes the log file name when file logging is on.
pub fn init_logging(app_name: &str) -> Result<()> {
    let console_log_level = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let file_log_level = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_to_file = env::var("LOG_TO_FILE").map(|v| v == "true").unwrap_or(false);

    // Span close events carry busy/idle timings for instrumented queries
    let console_layer = fmt::Layer::new()
        .pretty()
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(crate_filter(&console_log_level));

    if log_to_file {
        let log_dir = Path::new(LOG_DIR);
        fs::create_dir_all(log_dir).wrap_err("Failed to create log directory")?;

        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H:%M:%S");
        let file_appender =
            tracing_appender::rolling::never(log_dir, format!("{app_name}_{timestamp}.log"));
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        FILE_GUARD.set(guard).ok();

        let file_layer = fmt::Layer::new()
            .json()
            .with_writer(non_blocking)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(crate_filter(&file_log_level));

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .wrap_err("Failed to install tracing subscriber")?;
    } else {
        tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .wrap_err("Failed to install tracing subscriber")?;
    }

    Ok(())
}
