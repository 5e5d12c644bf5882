use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_DIR: &str = "logs";
const DEFAULT_DIRECTIVE: &str = "concert_finder=info";

/// Console output on stderr plus a daily-rotated JSON file under `logs/`.
///
/// The returned guard flushes the file writer when dropped, so hold it for
/// the life of the process. If the log directory cannot be created the file
/// layer is skipped, the failure is reported on stderr and no guard is
/// returned. `RUST_LOG` overrides the default level.
pub fn init_logging() -> Option<WorkerGuard> {
    let (file_layer, guard) = match prepare_log_dir(Path::new(LOG_DIR)) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::daily(LOG_DIR, "concert_finder.log");
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            (
                Some(fmt::layer().json().with_writer(non_blocking_writer)),
                Some(guard),
            )
        }
        Err(e) => {
            eprintln!("Failed to create log directory '{}': {}; file logging disabled", LOG_DIR, e);
            (None, None)
        }
    };
    // stdout carries command output
    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}

fn prepare_log_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}
