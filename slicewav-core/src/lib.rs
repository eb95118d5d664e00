//! Core library for batch conversion of media files into mono WAV slices.
//!
//! Every input file is converted to a single-channel `<base>.wav` with ffmpeg.
//! Converted files at or above the split threshold are cut into overlapping
//! slices named `<base>-〖<index>〗.wav` and the intermediate is removed once
//! every slice job has run. Re-running against the same output directory only
//! converts inputs that have neither a converted file nor a first slice.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use slicewav_core::{CoreConfig, Pipeline};
//! use slicewav_core::reporting::NullReporter;
//! use std::path::PathBuf;
//!
//! let config = CoreConfig::new(
//!     PathBuf::from("/path/to/input"),
//!     PathBuf::from("/path/to/output"),
//!     PathBuf::from("/path/to/logs"),
//! );
//! config.validate().unwrap();
//! slicewav_core::external::check_dependencies(&config).unwrap();
//!
//! let summary = Pipeline::from_config(config)
//!     .process_directories(&NullReporter)
//!     .unwrap();
//! println!("{summary}");
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod file_logging;
pub mod naming;
pub mod processing;
pub mod reporting;
pub mod util;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder, ProbeKind, SliceParams};
pub use discovery::{OutputState, find_input_files, scan_output_state};
pub use error::{CoreError, CoreResult};
pub use external::{Converter, DurationProbe, check_dependencies};
pub use naming::{slice_index, slice_offset};
pub use processing::{
    CompletionSignal, ConversionJob, ConversionOutcome, Pipeline, PlanDecision, SplitJob, plan,
};
pub use reporting::{JsonReporter, NullReporter, Reporter, RunSummary, TerminalReporter};
pub use util::TaskPool;
pub use utils::format_duration;
