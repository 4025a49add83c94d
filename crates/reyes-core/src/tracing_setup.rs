use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

/// Install a global `tracing` subscriber writing to `<log_dir>/reyes.log`,
/// filtered by `RUST_LOG` (or `info` if unset).
///
/// Returns the worker guard; dropping it flushes the non-blocking writer,
/// so callers must hold it for the render's lifetime. Returns `None` if a
/// subscriber is already installed (the front end installed its own),
/// matching this being a convenience, not a requirement.
pub fn install_tracing_subscriber(log_dir: &Path) -> anyhow::Result<Option<WorkerGuard>> {
    let file_appender = tracing_appender::rolling::never(log_dir, "reyes.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(writer)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        Err(_already_installed) => Ok(None),
    }
}
