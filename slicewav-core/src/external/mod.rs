// ============================================================================
// slicewav-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and the duration probes
//
// This module encapsulates every subprocess the pipeline runs. Conversion and
// slicing go through the `Converter` trait, duration measurement through the
// `DurationProbe` trait. Both are synchronous: a call blocks the worker thread
// until the tool exits and reports failure as a `CoreError` carrying the tool's
// output, never as a panic.
//
// KEY COMPONENTS:
// - Converter / DurationProbe traits
// - SidecarConverter (ffmpeg via ffmpeg-sidecar)
// - FfprobeProbe (ffprobe crate) and AfinfoProbe (macOS afinfo)
// - Dependency checking and platform detection

// ---- Internal crate imports ----
use crate::config::{CoreConfig, ProbeKind};
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::env;
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

// ============================================================================
// SUBMODULES
// ============================================================================

/// macOS `afinfo` duration probe and its output parser
pub mod afinfo;

/// ffmpeg conversion and slicing through ffmpeg-sidecar
pub mod ffmpeg_executor;

/// ffprobe duration probe
pub mod ffprobe_executor;

#[cfg(test)]
pub(crate) mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use afinfo::{AfinfoProbe, parse_afinfo_duration};
pub use ffmpeg_executor::SidecarConverter;
pub use ffprobe_executor::FfprobeProbe;

// ============================================================================
// TOOL TRAITS
// ============================================================================

/// Runs the external converter.
///
/// Implementations must be shareable across worker threads. On success both
/// methods return the tool's combined log output; on failure the error carries
/// it (see [`CoreError::tool_output`]).
pub trait Converter: Send + Sync {
    /// Converts `source` into `dest`, downmixing to a single channel.
    fn convert(&self, source: &Path, dest: &Path) -> CoreResult<String>;

    /// Copies `len_secs` seconds of `source` starting at `start_secs` into `dest`.
    fn slice(&self, source: &Path, dest: &Path, start_secs: u64, len_secs: u32)
    -> CoreResult<String>;
}

/// Measures the duration of a media file in seconds.
pub trait DurationProbe: Send + Sync {
    fn probe(&self, path: &Path) -> CoreResult<f64>;
}

/// Builds the production converter for a configuration.
pub fn converter_for(config: &CoreConfig) -> Arc<dyn Converter> {
    Arc::new(SidecarConverter::new(config.ffmpeg_path.clone()))
}

/// Builds the production duration probe for a configuration.
pub fn probe_for(config: &CoreConfig) -> Arc<dyn DurationProbe> {
    match config.probe.resolve() {
        ProbeKind::Afinfo => Arc::new(AfinfoProbe),
        _ => Arc::new(FfprobeProbe),
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external command can be started.
///
/// Runs `cmd_name` once with `probe_arg` and discards the output; only a
/// failure to start counts as missing. The exit status is ignored since some
/// tools (afinfo) exit non-zero when asked for usage.
pub fn check_dependency(cmd_name: &OsStr, probe_arg: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg(probe_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    let display_name = cmd_name.to_string_lossy();
    match result {
        Ok(_) => {
            log::debug!("Found dependency: {display_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{display_name}' not found.");
            Err(CoreError::DependencyNotFound(display_name.into_owned()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{display_name}': {e}");
            Err(CoreError::CommandStart(display_name.into_owned(), e))
        }
    }
}

/// Verifies the converter and the configured probe are runnable.
pub fn check_dependencies(config: &CoreConfig) -> CoreResult<()> {
    let ffmpeg = config
        .ffmpeg_path
        .as_deref()
        .map_or_else(|| OsStr::new("ffmpeg"), Path::as_os_str);
    check_dependency(ffmpeg, "-version")?;

    match config.probe.resolve() {
        ProbeKind::Afinfo => check_dependency(OsStr::new(afinfo::AFINFO), "-h"),
        _ => check_dependency(OsStr::new("ffprobe"), "-version"),
    }
}

// ============================================================================
// PLATFORM DETECTION
// ============================================================================

/// Checks if the current platform is macOS.
///
/// ```rust
/// use slicewav_core::external::is_macos;
///
/// if is_macos() {
///     println!("afinfo is available for duration probing");
/// }
/// ```
#[must_use]
pub fn is_macos() -> bool {
    env::consts::OS == "macos"
}
