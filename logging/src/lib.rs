use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, Local};
use config::groups::log::ConfigValueGroup as LogConfigGroup;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Default log levels. Override using the `RUST_LOG` env variable.
const DEFAULT_LOG_LEVEL_FILE: &str = "info";
const DEFAULT_LOG_LEVEL_CONSOLE: &str = "warn";

#[derive(Clone, Debug, PartialEq)]
pub enum LoggingMode {
    Directory(PathBuf),
    File(PathBuf),
    Console,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub logging_mode: LoggingMode,
    pub use_json: bool,
    pub prefix: String,
}

impl LoggingConfig {
    pub fn from_config(log: &LogConfigGroup) -> LoggingConfig {
        let logging_mode = match &log.dest {
            Some(dest) if dest.is_empty() => LoggingMode::Console,
            Some(dest) => {
                let path = PathBuf::from(dest);
                if dest.ends_with('/') || dest.ends_with('\\') || path.is_dir() {
                    LoggingMode::Directory(path)
                } else {
                    LoggingMode::File(path)
                }
            },
            None => LoggingMode::Console,
        };

        let use_json = match &log.format {
            Some(format) => format.to_ascii_lowercase().trim() == "json",
            None => logging_mode != LoggingMode::Console,
        };

        Self {
            logging_mode,
            use_json,
            prefix: log.prefix.clone(),
        }
    }
}

/// Sets up the global tracing subscriber. Should only be called once; later calls are ignored by
/// `tracing_subscriber` and leave the first subscriber in place.
pub fn init_logging(cfg: &LoggingConfig) {
    let maybe_log_file = match &cfg.logging_mode {
        LoggingMode::Directory(dir) => Some(log_file_in_dir(dir, &cfg.prefix)),
        LoggingMode::File(path) => Some(path.clone()),
        LoggingMode::Console => None,
    };

    if let Some(log_file) = maybe_log_file {
        // Fall back to the console if the file can't be written.
        if let Err(e) = init_logging_to_file(&log_file, cfg.use_json) {
            init_logging_to_console(cfg.use_json);
            error!("Error logging to file {log_file:?} ({e}); falling back to console logging.");
        }
    } else {
        init_logging_to_console(cfg.use_json);
    }

    info!("container_field logging initialized ({:?})", cfg.logging_mode);
}

fn init_logging_to_console(use_json: bool) {
    let fmt_layer_base = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_file(true)
        .with_target(false);
    let fmt_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_LEVEL_CONSOLE))
        .unwrap_or_default();

    let registry = tracing_subscriber::registry();
    if use_json {
        let _ = registry.with(fmt_layer_base.json().with_filter(fmt_filter)).try_init();
    } else {
        let _ = registry.with(fmt_layer_base.pretty().with_filter(fmt_filter)).try_init();
    }
}

fn init_logging_to_file(path: &Path, use_json: bool) -> Result<(), std::io::Error> {
    let Some(file_name) = path.file_name() else {
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "log path has no file name"));
    };

    let log_directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            parent
        },
        _ => Path::new("."),
    };

    // Fail early if the location is not writable so the caller can fall back to stderr.
    std::fs::write(path, [])?;

    let file_appender = tracing_appender::rolling::never(log_directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes the background writer on drop, so it lives for the rest of the process.
    static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
    let _ = FILE_GUARD.set(guard);

    let fmt_layer_base = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_file(true)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);
    let fmt_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_LEVEL_FILE))
        .unwrap_or_default();

    let registry = tracing_subscriber::registry();
    if use_json {
        let _ = registry.with(fmt_layer_base.json().with_filter(fmt_filter)).try_init();
    } else {
        let _ = registry.with(fmt_layer_base.pretty().with_filter(fmt_filter)).try_init();
    }

    Ok(())
}

/// Build `<prefix>_<YYYYMMDD>T<HHMMSS><mmm><+/-HHMM>_<pid>.log` in `dir`.
pub fn log_file_in_dir(dir: impl AsRef<Path>, prefix: &str) -> PathBuf {
    let now_local: DateTime<Local> = Local::now();
    let now_fixed: DateTime<FixedOffset> = now_local.with_timezone(now_local.offset());
    let ts = now_fixed.format("%Y%m%dT%H%M%S%3f%z");

    let pid = std::process::id();
    dir.as_ref().join(format!("{prefix}_{ts}_{pid}.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        let mut group = LogConfigGroup::new();
        let cfg = LoggingConfig::from_config(&group);
        assert_eq!(cfg.logging_mode, LoggingMode::Console);
        assert!(!cfg.use_json);

        group.dest = Some(String::new());
        assert_eq!(LoggingConfig::from_config(&group).logging_mode, LoggingMode::Console);

        group.dest = Some("/var/log/container/".to_string());
        let cfg = LoggingConfig::from_config(&group);
        assert_eq!(cfg.logging_mode, LoggingMode::Directory(PathBuf::from("/var/log/container/")));
        assert!(cfg.use_json);

        group.dest = Some("/nonexistent/dir/fields.log".to_string());
        group.format = Some("Text".to_string());
        let cfg = LoggingConfig::from_config(&group);
        assert_eq!(cfg.logging_mode, LoggingMode::File(PathBuf::from("/nonexistent/dir/fields.log")));
        assert!(!cfg.use_json);
    }

    #[test]
    fn test_existing_directory_is_directory_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut group = LogConfigGroup::new();
        group.dest = Some(dir.path().to_str().unwrap().to_string());
        let cfg = LoggingConfig::from_config(&group);
        assert_eq!(cfg.logging_mode, LoggingMode::Directory(dir.path().to_path_buf()));
    }

    #[test]
    fn test_log_file_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_in_dir(dir.path(), "container_field");
        assert_eq!(path.parent(), Some(dir.path()));

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("container_field_"), "{name}");
        assert!(name.ends_with(&format!("_{}.log", std::process::id())), "{name}");
    }
}
