use std::path::Path;

use tracing_appender::rolling::{InitError, Rotation};
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_PREFIX: &str = "worklog";

/// Routes tracing output to a daily rolling file under `state_dir/logs`.
/// The terminal UI owns stdout, so nothing is written there.
pub fn enable_logging(state_dir: &Path) -> Result<(), InitError> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(5)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(state_dir.join("logs"))?;

    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let filter = EnvFilter::try_new(format!(
        "{}={level}",
        env!("CARGO_PKG_NAME").replace('-', "_")
    ))
    .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(appender)
        .init();
    Ok(())
}
