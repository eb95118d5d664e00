//! Configuration structures and constants for the slicewav-core library.
//!
//! This module provides the configuration for a pipeline run: directories,
//! worker count, slice geometry and the choice of duration probe.

mod builder;

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// Offset in seconds between the start of consecutive slices.
pub const DEFAULT_CHUNK_STRIDE_SECS: u32 = 2700;

/// Length in seconds of each slice. Longer than the stride so neighbouring
/// slices overlap by 300 seconds.
pub const DEFAULT_CHUNK_LEN_SECS: u32 = 3000;

/// Converted files shorter than this many seconds are left whole.
pub const DEFAULT_SHORT_THRESHOLD_SECS: u32 = 3000;

/// Upper bound on the slices cut from one file. A duration needing more is
/// treated as a bad probe reading.
pub const MAX_SLICE_COUNT: u32 = 100_000;

/// Number of worker threads in the task pool.
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Slice geometry shared by conversion and split jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceParams {
    pub stride_secs: u32,
    pub len_secs: u32,
    pub short_threshold_secs: u32,
}

impl Default for SliceParams {
    fn default() -> Self {
        Self {
            stride_secs: DEFAULT_CHUNK_STRIDE_SECS,
            len_secs: DEFAULT_CHUNK_LEN_SECS,
            short_threshold_secs: DEFAULT_SHORT_THRESHOLD_SECS,
        }
    }
}

impl SliceParams {
    /// Whether a converted file of `duration_secs` must be split.
    #[must_use]
    pub fn needs_split(&self, duration_secs: f64) -> bool {
        duration_secs >= f64::from(self.short_threshold_secs)
    }

    /// Number of slices covering `duration_secs`: every `i >= 0` with
    /// `i * stride < duration`.
    ///
    /// Returns `None` when the duration is not finite or would need more than
    /// [`MAX_SLICE_COUNT`] slices.
    #[must_use]
    pub fn slice_count(&self, duration_secs: f64) -> Option<u32> {
        if self.stride_secs == 0 || !duration_secs.is_finite() {
            return None;
        }
        if duration_secs <= 0.0 {
            return Some(0);
        }
        let count = (duration_secs / f64::from(self.stride_secs)).ceil();
        if count > f64::from(MAX_SLICE_COUNT) {
            return None;
        }
        Some(count as u32)
    }

    /// Start offset in whole seconds for slice `index`.
    #[must_use]
    pub fn slice_start_secs(&self, index: u32) -> u64 {
        u64::from(index) * u64::from(self.stride_secs)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.stride_secs == 0 {
            return Err(CoreError::Config("chunk stride must be greater than zero".to_string()));
        }
        if self.len_secs < self.stride_secs {
            return Err(CoreError::Config(format!(
                "chunk length ({}s) is shorter than the stride ({}s); slices would leave gaps",
                self.len_secs, self.stride_secs
            )));
        }
        Ok(())
    }
}

/// Which external tool measures converted file durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeKind {
    /// `afinfo` on macOS, `ffprobe` everywhere else.
    #[default]
    Auto,
    /// macOS `afinfo -b`.
    Afinfo,
    /// `ffprobe` format duration.
    Ffprobe,
}

impl ProbeKind {
    /// Resolves `Auto` against the current platform.
    #[must_use]
    pub fn resolve(self) -> ProbeKind {
        match self {
            ProbeKind::Auto if crate::external::is_macos() => ProbeKind::Afinfo,
            ProbeKind::Auto => ProbeKind::Ffprobe,
            other => other,
        }
    }
}

/// Main configuration structure for the slicewav-core library.
///
/// Typically created by the CLI from its arguments and handed to
/// [`crate::Pipeline::new`].
///
/// # Examples
///
/// ```rust
/// use slicewav_core::config::CoreConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .input_dir(PathBuf::from("/path/to/media"))
///     .output_dir(PathBuf::from("/path/to/wav"))
///     .worker_count(8)
///     .build();
/// assert_eq!(config.worker_count, 8);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory containing the media files to convert
    pub input_dir: PathBuf,

    /// Directory receiving converted files and slices
    pub output_dir: PathBuf,

    /// Directory for run log files
    pub log_dir: PathBuf,

    /// Number of worker threads in the task pool
    pub worker_count: usize,

    /// Slice stride, length and split threshold
    pub slicing: SliceParams,

    /// Duration probe selection
    pub probe: ProbeKind,

    /// Explicit ffmpeg binary; `None` resolves `ffmpeg` from the environment
    pub ffmpeg_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            log_dir: PathBuf::from("."),
            worker_count: DEFAULT_WORKER_COUNT,
            slicing: SliceParams::default(),
            probe: ProbeKind::default(),
            ffmpeg_path: None,
        }
    }
}

impl CoreConfig {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, log_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            log_dir,
            ..Default::default()
        }
    }

    /// Checks the configuration before any work is planned.
    pub fn validate(&self) -> CoreResult<()> {
        if self.worker_count == 0 {
            return Err(CoreError::Config("worker count must be at least 1".to_string()));
        }
        self.slicing.validate()?;

        if !self.input_dir.exists() {
            return Err(CoreError::PathError(format!(
                "Input directory does not exist: {}",
                self.input_dir.display()
            )));
        }
        if !self.input_dir.is_dir() {
            return Err(CoreError::PathError(format!(
                "{} is not a directory",
                self.input_dir.display()
            )));
        }
        Ok(())
    }
}
