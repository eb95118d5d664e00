//! macOS `afinfo` duration probe.
//!
//! `afinfo -b <file>` prints a brief report whose third line starts with the
//! duration, e.g. `42.048 sec, format: 2 ch, 44100 Hz, ...`.

use std::path::Path;
use std::process::{Command, Stdio};

use super::DurationProbe;
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};

/// Name of the afinfo executable.
pub const AFINFO: &str = "afinfo";

/// Zero-based line of the brief report carrying the duration.
const DURATION_LINE: usize = 2;

/// [`DurationProbe`] backed by `afinfo -b`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AfinfoProbe;

impl DurationProbe for AfinfoProbe {
    fn probe(&self, path: &Path) -> CoreResult<f64> {
        log::debug!("Running afinfo for duration on: {}", path.display());
        let output = Command::new(AFINFO)
            .arg("-b")
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| command_start_error(AFINFO, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let mut combined = stdout.into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(command_failed_error(AFINFO, output.status, combined));
        }

        parse_afinfo_duration(&stdout)
    }
}

/// Extracts the duration in seconds from `afinfo -b` output.
///
/// The third line is split at its first space and the leading token parsed as
/// a float. Anything else is a [`CoreError::ProbeParse`].
pub fn parse_afinfo_duration(output: &str) -> CoreResult<f64> {
    let line = output.lines().nth(DURATION_LINE).ok_or_else(|| {
        CoreError::ProbeParse(format!(
            "afinfo output has fewer than {} lines",
            DURATION_LINE + 1
        ))
    })?;

    let token = line.split_once(' ').map_or(line, |(first, _)| first);
    token.parse::<f64>().map_err(|e| {
        CoreError::ProbeParse(format!("Invalid afinfo duration '{token}': {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brief_report() {
        let output = "some.wav, WAVE, Num Tracks:     1\n----\n42.048 sec, format:   2 ch,  44100 Hz, 'lpcm' (0x0000000C) 16-bit little-endian signed integer\n";
        assert_eq!(parse_afinfo_duration(output).unwrap(), 42.048);
    }

    #[test]
    fn test_parse_short_output() {
        assert!(matches!(
            parse_afinfo_duration("only one line\n"),
            Err(CoreError::ProbeParse(_))
        ));
    }

    #[test]
    fn test_parse_non_numeric() {
        let output = "a\n----\nunknown sec, format: x\n";
        assert!(matches!(
            parse_afinfo_duration(output),
            Err(CoreError::ProbeParse(_))
        ));
    }
}
