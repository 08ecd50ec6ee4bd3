use std::sync::{Mutex, OnceLock};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use agent_chat::share::get_share_dir;

pub const DEBUG_ENV: &str = "DEBUG";

static DEBUG_FLAG: OnceLock<bool> = OnceLock::new();
static LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);
static LOG_INIT: OnceLock<()> = OnceLock::new();

/// `1` and `true` (any case) enable debug output; everything else, including unset, does not.
pub fn is_debug_value(value: Option<&str>) -> bool {
    matches!(
        value.map(str::to_lowercase).as_deref(),
        Some("1") | Some("true")
    )
}

/// Reads `DEBUG` once per process.
pub fn debug_enabled() -> bool {
    *DEBUG_FLAG.get_or_init(|| is_debug_value(std::env::var(DEBUG_ENV).ok().as_deref()))
}

/// Without debug only errors are recorded; warnings and below are dropped.
pub fn level_filter(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::TRACE
    } else {
        LevelFilter::ERROR
    }
}

pub async fn init_logging(debug: bool) -> anyhow::Result<()> {
    if LOG_INIT.get().is_some() {
        return Ok(());
    }

    let log_dir = match get_share_dir() {
        Ok(dir) => {
            let dir = dir.join("logs");
            match tokio::fs::create_dir_all(&dir).await {
                Ok(()) => Some(dir),
                Err(err) => {
                    eprintln!("Failed to create log dir {}: {err}", dir.display());
                    None
                }
            }
        }
        Err(err) => {
            eprintln!("{err}");
            None
        }
    };

    let file_layer = log_dir.map(|dir| {
        let file_appender = tracing_appender::rolling::daily(dir, "openhands.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        if let Ok(mut slot) = LOG_GUARD.lock() {
            *slot = Some(guard);
        }
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
    });
    let stderr_layer = if file_layer.is_none() {
        Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(level_filter(debug))
        .try_init()?;

    let _ = LOG_INIT.set(());
    Ok(())
}

/// Flushes buffered log lines. Call before `process::exit`.
pub fn shutdown_logging() {
    if let Ok(mut slot) = LOG_GUARD.lock() {
        slot.take();
    }
}
