//! ffprobe duration probe.
//!
//! Reads the container-level duration reported by ffprobe. Used on every
//! platform except macOS, where `afinfo` is preferred by default.

use std::path::Path;

use ffprobe::{FfProbeError, ffprobe};

use super::DurationProbe;
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};

/// [`DurationProbe`] backed by ffprobe.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfprobeProbe;

impl DurationProbe for FfprobeProbe {
    fn probe(&self, path: &Path) -> CoreResult<f64> {
        log::debug!("Running ffprobe (via crate) for duration on: {}", path.display());
        match ffprobe(path) {
            Ok(metadata) => {
                let raw = metadata.format.duration.ok_or_else(|| {
                    CoreError::ProbeParse(format!(
                        "ffprobe reported no duration for {}",
                        path.display()
                    ))
                })?;
                parse_duration_field(&raw)
            }
            Err(err) => {
                log::error!("ffprobe failed for duration on {}: {:?}", path.display(), err);
                Err(map_ffprobe_error(err, "duration"))
            }
        }
    }
}

fn parse_duration_field(raw: &str) -> CoreResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| CoreError::ProbeParse(format!("Invalid ffprobe duration '{raw}': {e}")))
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::ProbeParse(format!("ffprobe {context} output deserialization: {err}"))
        }
        _ => CoreError::ProbeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}
