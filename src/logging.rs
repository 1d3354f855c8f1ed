//! Logging initialization: `tracing` with a daily-rolling file sink so the
//! log path derives from the current date, one line per event. `RUST_LOG`
//! overrides the default level; `--verbose` lowers it to debug.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber writing to `<log_dir>/kickstart.log.<date>`.
///
/// Returns the appender guard; hold it for the process lifetime so buffered
/// lines are flushed on shutdown. Safe to call more than once; subsequent
/// calls leave the first subscriber in place.
pub fn init(log_dir: &str, verbose: bool) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(log_dir, "kickstart.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    guard
}
