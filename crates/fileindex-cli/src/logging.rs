use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";
const DEFAULT_LOG_FILE_PATH: &str = "./logs/fileindex.log";

/// Where and how much to log. Read from `TRACING_LEVEL` and `LOG_FILE_PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub filter: String,
    pub file_path: PathBuf,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::resolve(env::var("TRACING_LEVEL").ok(), env::var("LOG_FILE_PATH").ok())
    }

    fn resolve(filter: Option<String>, file_path: Option<String>) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            filter: non_empty(filter).unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            file_path: PathBuf::from(
                non_empty(file_path).unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
            ),
        }
    }

    /// Directory and file name for the appender. A bare file name logs into
    /// the working directory.
    fn file_parts(&self) -> (PathBuf, OsString) {
        let dir = match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = self
            .file_path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| OsString::from("fileindex.log"));
        (dir, name)
    }
}

/// Install a pretty stdout layer and a plain file layer. Hold the returned
/// guard for the life of `main`; dropping it flushes the file writer.
pub fn init_logger(settings: &LogSettings) -> WorkerGuard {
    let (filter_layer, bad_filter) = match EnvFilter::try_new(&settings.filter) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_FILTER), Some(err)),
    };

    let (dir, file_name) = settings.file_parts();
    let file_appender = tracing_appender::rolling::never(&dir, Path::new(&file_name));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .without_time()
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    if let Some(err) = bad_filter {
        warn!("Ignoring TRACING_LEVEL {:?}: {}", settings.filter, err);
    }
    info!("Logging to stdout and {}", settings.file_path.display());

    guard
}
