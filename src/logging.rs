use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "clue-drill.log";

/// Keeps the background file writer alive; drop it only at shutdown.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber: stdout always, plus a daily rolling file
/// under `config.log_dir` when file logging is enabled.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match file_writer(config) {
        Some((writer, guard)) => (
            Some(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    if guard.is_some() {
        tracing::info!(log_dir = %config.log_dir, "file logging enabled");
    }
    guard.map(|guard| FileLogGuard { _guard: guard })
}

fn file_writer(config: &Config) -> Option<(NonBlocking, WorkerGuard)> {
    if !config.enable_file_logs {
        return None;
    }

    // the subscriber is not installed yet, so this cannot go through tracing
    if let Err(err) = std::fs::create_dir_all(&config.log_dir) {
        eprintln!("failed to create log directory {}: {err}", config.log_dir);
        return None;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_writer_when_disabled() {
        let config = Config {
            enable_file_logs: false,
            log_dir: "/nonexistent/clue-drill-logs".to_string(),
            ..Config::default()
        };
        assert!(file_writer(&config).is_none());
        assert!(!std::path::Path::new(&config.log_dir).exists());
    }

    #[test]
    fn test_file_writer_creates_log_dir() {
        let dir = std::env::temp_dir().join(format!("clue-drill-logs-{}", std::process::id()));
        let config = Config {
            enable_file_logs: true,
            log_dir: dir.to_string_lossy().into_owned(),
            ..Config::default()
        };
        assert!(file_writer(&config).is_some());
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
