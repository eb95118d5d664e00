// ============================================================================
// slicewav-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: File and console logging for a run
//
// By default every run writes `slicewav_run_<timestamp>.log` through the core
// log4rs helper. With `--no-log` only the console logger (env_logger) is
// installed. Console output from env_logger honours RUST_LOG when set:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug: Detailed debugging information

use crate::error::{CliErrorContext, CliResult};
use log::LevelFilter;
use slicewav_core::file_logging::{run_log_path, setup_file_logging};
use std::path::{Path, PathBuf};

/// Log level for the run.
#[must_use]
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger. Returns the log file path when one is written.
///
/// `console` mirrors file logging to stderr; it is turned off when stdout is
/// reserved for JSON progress and the terminal reporter already shows status.
pub fn init_logging(
    log_dir: Option<&Path>,
    level: LevelFilter,
    console: bool,
) -> CliResult<Option<PathBuf>> {
    match log_dir {
        Some(dir) => {
            let path = run_log_path(dir);
            setup_file_logging(&path, level, console)
                .map_err(|e| slicewav_core::CoreError::OperationFailed(e.to_string()))
                .cli_with_context(|| format!("Failed to set up logging in {}", dir.display()))?;
            Ok(Some(path))
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .format_timestamp(None)
                .try_init()
                .map_err(|e| slicewav_core::CoreError::OperationFailed(e.to_string()))?;
            Ok(None)
        }
    }
}
