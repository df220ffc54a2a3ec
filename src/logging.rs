use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use pixtrail::kernel::services::adapters::ensure_log_dir;
use pixtrail::kernel::services::ports::Settings;

const DEFAULT_FILTER: &str = "pixtrail=info";
const LOG_FILE_PREFIX: &str = "pixtrail.log";

/// Where the active filter directive came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    Env,
    Settings,
    Default,
}

pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
    filter: FilterSource,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn filter_source(&self) -> FilterSource {
        self.filter
    }
}

/// `RUST_LOG` wins over `log_filter` in the settings file. Blank or
/// unparsable candidates fall through to the next one.
pub fn select_filter(env: Option<&str>, settings: &Settings) -> (EnvFilter, FilterSource) {
    let candidates = [
        (env, FilterSource::Env),
        (settings.log_filter.as_deref(), FilterSource::Settings),
    ];
    for (directive, source) in candidates {
        let Some(directive) = directive.map(str::trim).filter(|d| !d.is_empty()) else {
            continue;
        };
        match EnvFilter::try_new(directive) {
            Ok(filter) => return (filter, source),
            Err(e) => eprintln!("ignoring log filter {directive:?} from {source:?}: {e}"),
        }
    }
    (EnvFilter::new(DEFAULT_FILTER), FilterSource::Default)
}

fn resolve_log_dir() -> Option<PathBuf> {
    ensure_log_dir()
        .or_else(|_| -> std::io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("pixtrail").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()
}

pub fn init(settings: &Settings) -> Option<LoggingGuard> {
    let log_dir = resolve_log_dir()?;
    let (non_blocking, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX));

    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (env_filter, filter) = select_filter(env.as_deref(), settings);

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_line_number(true),
    );
    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));
    tracing::info!(log_dir = %log_dir.display(), filter = ?filter, "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
        filter,
    })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
