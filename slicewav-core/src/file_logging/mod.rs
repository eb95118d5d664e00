//! Run log files.
//!
//! Each run writes a timestamped log file through log4rs, optionally mirrored
//! to stderr.

pub mod setup;

pub use setup::{run_log_path, setup_file_logging};
