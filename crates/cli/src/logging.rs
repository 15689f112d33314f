use anyhow::{anyhow, Result};
use repo_images_config::LogConfig;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log files larger than this are truncated on startup.
const MAX_LOG_FILE_SIZE: u64 = 8 * 1024 * 1024;

/// Installs the global subscriber.
///
/// Logs go to `log_path` (or the `log-file` of the config) when given, to stderr
/// otherwise. The returned guard must be kept alive to flush the file writer.
pub fn init(log_path: Option<PathBuf>, log_config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let maybe_log = log_path.or_else(|| log_config.log_file.as_ref().map(PathBuf::from));

    let Some(log_path) = maybe_log else {
        let env_filter = if log_config.log_target.is_empty() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(&log_config.log_target)
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow!("failed to install the subscriber: {e}"))?;

        return Ok(None);
    };

    if let Ok(metadata) = std::fs::metadata(&log_path) {
        if log_path.is_file() && metadata.len() > MAX_LOG_FILE_SIZE {
            std::fs::remove_file(&log_path)?;
        }
    }

    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow!("no file name in {log_path:?}"))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| anyhow!("{log_path:?} has no parent"))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let builder = tracing_subscriber::FmtSubscriber::builder()
        .with_line_number(true)
        .with_writer(non_blocking)
        .with_ansi(false);

    if log_config.log_target.is_empty() {
        let max_level = log_config
            .max_level
            .parse()
            .unwrap_or(tracing::Level::DEBUG);
        tracing::subscriber::set_global_default(builder.with_max_level(max_level).finish())?;
    } else {
        let env_filter = EnvFilter::new(&log_config.log_target);
        tracing::subscriber::set_global_default(builder.with_env_filter(env_filter).finish())?;
    }

    Ok(Some(guard))
}
