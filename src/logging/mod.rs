//! Logging setup for the garbage sorter
//!
//! - Custom bracketed event format with span context
//! - Dual output (stderr + timestamped log file)

mod formatter;
mod setup;

pub use formatter::BracketedFormatter;
pub use setup::{log_file_path, setup_logging};
