//! Command implementations for the CLI.

/// Plans and runs the conversion pipeline for one directory pair.
pub mod run;
