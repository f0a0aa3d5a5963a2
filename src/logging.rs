use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Where log lines go.
///
/// The terminal UI owns stdout/stderr while it runs, so it logs to a file.
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file output gets flushed.
pub fn init(filter: &str, target: LogTarget<'_>) -> Result<Option<WorkerGuard>> {
    let filter_layer = EnvFilter::try_new(filter)
        .with_context(|| format!("Invalid log filter: {}", filter))?;

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to install tracing subscriber")?;
            Ok(None)
        }
        LogTarget::File(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);

            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
                .context("Failed to install tracing subscriber")?;
            Ok(Some(guard))
        }
    }
}
