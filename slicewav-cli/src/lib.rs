// slicewav-cli/src/lib.rs
//
// Library portion of the slicewav CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, ProbeArg};
pub use commands::run::{build_config, prepare, run_pipeline};
pub use error::{CliErrorContext, CliResult};
