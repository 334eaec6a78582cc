use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;

/// Build the log file path for a run started now
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    log_dir.join(format!("garbage_sorter_{}.log", timestamp))
}

/// Install the global tracing subscriber.
///
/// Events go to stderr, and to a timestamped file under `log_dir` when one
/// is given. `RUST_LOG` takes precedence over `default_filter`.
///
/// # Returns
/// * `Ok(Some(path))` with the log file path when file logging is on
/// * `Err(io::Error)` if the log directory or file could not be created
pub fn setup_logging(log_dir: Option<&Path>, default_filter: &str) -> io::Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Decoder crates are chatty at debug level
        EnvFilter::new(default_filter)
            .add_directive("image=warn".parse().expect("static directive"))
            .add_directive("png=warn".parse().expect("static directive"))
    });

    let stderr_layer = fmt::layer()
        .event_format(BracketedFormatter)
        .with_writer(io::stderr);

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let log_path = log_file_path(dir);
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&log_path)?;
            let layer = fmt::layer()
                .event_format(BracketedFormatter)
                .with_writer(Mutex::new(file))
                .with_ansi(false);
            (Some(layer), Some(log_path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    if let Some(path) = &log_path {
        info!("Log file created at: {:?}", path);
    }

    Ok(log_path)
}
