// slicewav-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

use super::{Converter, DurationProbe};
use crate::error::{CoreError, CoreResult, command_failed_error};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn failed_status() -> ExitStatus {
    ExitStatus::from_raw(1 << 8)
}

/// A converter invocation seen by [`MockConverter`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Convert {
        source: PathBuf,
        dest: PathBuf,
    },
    Slice {
        source: PathBuf,
        dest: PathBuf,
        start_secs: u64,
        len_secs: u32,
        /// Whether `source` was on disk when the slice started.
        source_present: bool,
    },
}

#[derive(Default)]
struct ConverterState {
    calls: Vec<MockCall>,
    failing_sources: HashSet<String>,
    failing_slice_starts: HashSet<u64>,
    slice_delay: Duration,
}

/// Converter that writes placeholder files instead of running ffmpeg.
///
/// Failures are configured by source file name (conversion) or by slice start
/// offset; a failing call still leaves a partial destination behind, the way
/// an aborted ffmpeg run would.
#[derive(Default)]
pub struct MockConverter {
    state: Mutex<ConverterState>,
}

impl MockConverter {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ConverterState> {
        self.state.lock().unwrap()
    }

    /// Makes conversion of the source with this file name fail.
    pub fn fail_source(self, name: &str) -> Self {
        self.state().failing_sources.insert(name.to_string());
        self
    }

    /// Makes every slice starting at `start_secs` fail.
    pub fn fail_slice_at(self, start_secs: u64) -> Self {
        self.state().failing_slice_starts.insert(start_secs);
        self
    }

    /// Sleeps this long inside every slice call.
    pub fn with_slice_delay(self, delay: Duration) -> Self {
        self.state().slice_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    pub fn convert_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| matches!(c, MockCall::Convert { .. }))
            .count()
    }

    /// Slice calls as `(dest file name, start_secs, source_present)`, sorted.
    pub fn slices(&self) -> Vec<(String, u64, bool)> {
        let mut slices: Vec<_> = self
            .state()
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Slice {
                    dest,
                    start_secs,
                    source_present,
                    ..
                } => Some((file_name(dest), *start_secs, *source_present)),
                MockCall::Convert { .. } => None,
            })
            .collect();
        slices.sort();
        slices
    }
}

impl Converter for MockConverter {
    fn convert(&self, source: &Path, dest: &Path) -> CoreResult<String> {
        let fail = {
            let mut state = self.state();
            state.calls.push(MockCall::Convert {
                source: source.to_path_buf(),
                dest: dest.to_path_buf(),
            });
            state.failing_sources.contains(&file_name(source))
        };

        if fail {
            fs::write(dest, b"partial")?;
            return Err(command_failed_error(
                "mock ffmpeg (convert)",
                failed_status(),
                format!("{}: Invalid data found when processing input", source.display()),
            ));
        }
        fs::write(dest, b"RIFF")?;
        Ok(format!("converted {}", source.display()))
    }

    fn slice(
        &self,
        source: &Path,
        dest: &Path,
        start_secs: u64,
        len_secs: u32,
    ) -> CoreResult<String> {
        let (fail, delay) = {
            let mut state = self.state();
            state.calls.push(MockCall::Slice {
                source: source.to_path_buf(),
                dest: dest.to_path_buf(),
                start_secs,
                len_secs,
                source_present: source.exists(),
            });
            (
                state.failing_slice_starts.contains(&start_secs),
                state.slice_delay,
            )
        };

        if !delay.is_zero() {
            thread::sleep(delay);
        }
        if fail {
            fs::write(dest, b"partial")?;
            return Err(command_failed_error(
                "mock ffmpeg (slice)",
                failed_status(),
                "Conversion failed!".to_string(),
            ));
        }
        fs::write(dest, b"RIFF")?;
        Ok(format!("sliced {} at {start_secs}", source.display()))
    }
}

/// Probe answering from a table of durations keyed by file name.
#[derive(Default)]
pub struct MockProbe {
    durations: HashMap<String, f64>,
    probed: Mutex<Vec<PathBuf>>,
}

impl MockProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, name: &str, secs: f64) -> Self {
        self.durations.insert(name.to_string(), secs);
        self
    }

    pub fn probed(&self) -> Vec<PathBuf> {
        self.probed.lock().unwrap().clone()
    }
}

impl DurationProbe for MockProbe {
    fn probe(&self, path: &Path) -> CoreResult<f64> {
        self.probed.lock().unwrap().push(path.to_path_buf());
        let name = file_name(path);
        self.durations
            .get(&name)
            .copied()
            .ok_or_else(|| CoreError::ProbeParse(format!("no mock duration for {name}")))
    }
}
