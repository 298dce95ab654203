use std::fs::create_dir_all;
use std::path::Path;

use eyre::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_PREFIX: &str = "roomtuned.log";

/// Logs to stderr and, when `log_dir` is set, to a daily rolling file. The returned guard
/// flushes the file writer and must be held until the process exits.
pub fn init(log_level: &str, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level)
        .wrap_err_with(|| format!("invalid log filter {log_level:?}"))?;

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            create_dir_all(dir)
                .wrap_err_with(|| format!("error creating log directory {dir:?}"))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .wrap_err("error installing the tracing subscriber")?;

    Ok(guard)
}
