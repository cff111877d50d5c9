use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "rollout-invalidator.log";

// Client libraries are chatty at debug; keep them at info unless RUST_LOG says otherwise.
const QUIET_DEPENDENCIES: &str =
    "hyper=info,hyper_util=info,h2=info,rustls=info,tower=info,kube_client=info,aws_config=info,aws_smithy_runtime=info,redis=info";

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `debug_logging` picks between debug and info.
/// When `log_dir` is set, a daily rolling file is written next to stdout and the returned
/// guard must be kept alive until shutdown so buffered lines get flushed.
pub fn init_tracing(debug_logging: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = if debug_logging { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},{}", level, QUIET_DEPENDENCIES)));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
