//! Conversion of one input into its canonical intermediate.
//!
//! A [`ConversionJob`] runs on a pool worker: convert, probe, then either stop
//! (short file) or submit one [`SplitJob`] per slice back into the pool. It
//! always finishes by sending exactly one [`CompletionSignal`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use super::JobContext;
use super::split::{SplitJob, remove_partial};
use crate::config::MAX_SLICE_COUNT;
use crate::error::CoreError;
use crate::naming;
use crate::reporting::{ConversionReport, ConversionStatus};
use crate::util::TaskPool;
use crate::utils::display_name;

/// Converts one input file into `<base>.wav` in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub base_name: String,
}

/// How a conversion job ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    ConvertFailed {
        message: String,
    },
    ProbeFailed {
        message: String,
    },
    /// Below the split threshold; the converted file is the final output.
    Short {
        duration_secs: f64,
    },
    /// Slices were queued. `complete` is false when the pool refused some of
    /// them, in which case the intermediate must be kept.
    Split {
        intermediate: PathBuf,
        duration_secs: f64,
        slices: u32,
        complete: bool,
    },
}

impl ConversionOutcome {
    #[must_use]
    pub fn status(&self) -> ConversionStatus {
        match self {
            Self::ConvertFailed { .. } => ConversionStatus::ConvertFailed,
            Self::ProbeFailed { .. } => ConversionStatus::ProbeFailed,
            Self::Short { .. } => ConversionStatus::Short,
            Self::Split { .. } => ConversionStatus::Split,
        }
    }

    /// Intermediate to delete once the pool has drained, if any.
    #[must_use]
    pub fn intermediate_to_delete(&self) -> Option<&Path> {
        match self {
            Self::Split {
                intermediate,
                complete: true,
                ..
            } => Some(intermediate),
            _ => None,
        }
    }
}

/// Sent exactly once per conversion job.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSignal {
    pub source: PathBuf,
    pub outcome: ConversionOutcome,
}

impl CompletionSignal {
    #[must_use]
    pub fn intermediate_to_delete(&self) -> Option<&Path> {
        self.outcome.intermediate_to_delete()
    }

    #[must_use]
    pub fn to_report(&self) -> ConversionReport {
        let (duration_secs, slices, message) = match &self.outcome {
            ConversionOutcome::ConvertFailed { message }
            | ConversionOutcome::ProbeFailed { message } => (None, 0, Some(message.clone())),
            ConversionOutcome::Short { duration_secs } => (Some(*duration_secs), 0, None),
            ConversionOutcome::Split {
                duration_secs,
                slices,
                complete,
                ..
            } => (
                Some(*duration_secs),
                *slices,
                (!complete).then(|| "not every slice could be queued".to_string()),
            ),
        };
        ConversionReport {
            source: display_name(&self.source),
            status: self.outcome.status(),
            duration_secs,
            slices,
            message,
        }
    }
}

fn log_tool_failure(what: &str, source: &Path, err: &CoreError) {
    log::error!("{} failed for {}: {}", what, source.display(), err);
    if let Some(output) = err.tool_output() {
        log::error!("Tool output:\n{output}");
    }
}

impl ConversionJob {
    pub fn new(source: &Path, output_dir: &Path, base_name: &str) -> Self {
        Self {
            source: source.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            base_name: base_name.to_string(),
        }
    }

    #[must_use]
    pub fn dest_name(&self) -> String {
        naming::converted_name(&self.base_name)
    }

    #[must_use]
    pub fn dest_path(&self) -> PathBuf {
        self.output_dir.join(self.dest_name())
    }

    /// Name of slice 0, whose presence marks the input as already split.
    #[must_use]
    pub fn slice_marker_name(&self) -> String {
        naming::slice_name(&self.base_name, 0)
    }

    #[must_use]
    pub fn slice_marker_path(&self) -> PathBuf {
        self.output_dir.join(self.slice_marker_name())
    }

    /// Converts, probes and fans out split jobs onto `pool`.
    pub fn execute(&self, ctx: &JobContext, pool: &TaskPool) -> ConversionOutcome {
        let dest = self.dest_path();
        log::info!("Converting {} -> {}", self.source.display(), dest.display());

        if let Err(e) = ctx.converter.convert(&self.source, &dest) {
            log_tool_failure("Conversion", &self.source, &e);
            remove_partial(&dest);
            return ConversionOutcome::ConvertFailed {
                message: e.to_string(),
            };
        }

        let duration_secs = match ctx.probe.probe(&dest) {
            Ok(d) if d.is_finite() && d >= 0.0 => d,
            Ok(d) => {
                let message = format!("probe reported an invalid duration ({d})");
                log::error!("{} for {}", message, dest.display());
                return ConversionOutcome::ProbeFailed { message };
            }
            Err(e) => {
                log_tool_failure("Duration probe", &dest, &e);
                return ConversionOutcome::ProbeFailed {
                    message: e.to_string(),
                };
            }
        };

        let slicing = ctx.slicing;
        let Some(count) = slicing.slice_count(duration_secs) else {
            let message = format!(
                "probe reported {duration_secs}s, more than {} slices of {}s",
                MAX_SLICE_COUNT, slicing.stride_secs
            );
            log::error!("{} for {}", message, dest.display());
            return ConversionOutcome::ProbeFailed { message };
        };
        if !slicing.needs_split(duration_secs) || count == 0 {
            log::info!(
                "{} is {:.1}s, below the {}s split threshold",
                dest.display(),
                duration_secs,
                slicing.short_threshold_secs
            );
            return ConversionOutcome::Short { duration_secs };
        }

        log::info!(
            "{} is {:.1}s, splitting into {} slices",
            dest.display(),
            duration_secs,
            count
        );
        let mut queued = 0;
        for index in 0..count {
            let split = SplitJob::new(&dest, &self.output_dir, &self.base_name, index);
            let converter = Arc::clone(&ctx.converter);
            match pool.submit(move || split.run(converter.as_ref(), &slicing)) {
                Ok(()) => queued += 1,
                Err(e) => {
                    log::error!(
                        "Could not queue slice {} of {}: {}",
                        index,
                        dest.display(),
                        e
                    );
                    break;
                }
            }
        }

        ConversionOutcome::Split {
            intermediate: dest,
            duration_secs,
            slices: queued,
            complete: queued == count,
        }
    }

    /// Runs the job on a worker and signals completion on `completions`.
    pub fn run(self, ctx: &JobContext, pool: &TaskPool, completions: &Sender<CompletionSignal>) {
        let outcome = self.execute(ctx, pool);
        let signal = CompletionSignal {
            source: self.source,
            outcome,
        };
        if completions.send(signal).is_err() {
            log::warn!("Completion receiver is gone; signal dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SliceParams;
    use crate::external::mocks::{MockConverter, MockProbe};
    use std::sync::mpsc;

    fn context(converter: MockConverter, probe: MockProbe) -> (JobContext, Arc<MockConverter>) {
        let converter = Arc::new(converter);
        let ctx = JobContext {
            converter: converter.clone(),
            probe: Arc::new(probe),
            slicing: SliceParams::default(),
        };
        (ctx, converter)
    }

    #[test]
    fn test_derived_names() {
        let job = ConversionJob::new(Path::new("/in/my-talk.mp3"), Path::new("/out"), "my-talk");
        assert_eq!(job.dest_name(), "my-talk.wav");
        assert_eq!(job.dest_path(), PathBuf::from("/out/my-talk.wav"));
        assert_eq!(job.slice_marker_name(), "my-talk-〖0〗.wav");
        assert_eq!(job.slice_marker_path(), PathBuf::from("/out/my-talk-〖0〗.wav"));
    }

    #[test]
    fn test_short_file_needs_no_split() {
        let dir = tempfile::tempdir().unwrap();
        let job = ConversionJob::new(&dir.path().join("a.mp3"), dir.path(), "a");
        let (ctx, converter) = context(
            MockConverter::new(),
            MockProbe::new().with_duration("a.wav", 2999.9),
        );
        let pool = TaskPool::new(2).unwrap();

        let outcome = job.execute(&ctx, &pool);
        pool.stop_wait();

        assert_eq!(outcome, ConversionOutcome::Short { duration_secs: 2999.9 });
        assert_eq!(outcome.intermediate_to_delete(), None);
        assert!(converter.slices().is_empty());
        assert!(dir.path().join("a.wav").exists());
    }

    #[test]
    fn test_threshold_duration_splits() {
        let dir = tempfile::tempdir().unwrap();
        let job = ConversionJob::new(&dir.path().join("a.mp3"), dir.path(), "a");
        let (ctx, converter) = context(
            MockConverter::new(),
            MockProbe::new().with_duration("a.wav", 3000.0),
        );
        let pool = TaskPool::new(2).unwrap();

        let outcome = job.execute(&ctx, &pool);
        pool.stop_wait();

        // 0 < 3000 and 2700 < 3000, 5400 >= 3000
        assert_eq!(converter.slices().len(), 2);
        assert_eq!(outcome.intermediate_to_delete(), Some(dir.path().join("a.wav").as_path()));
    }

    #[test]
    fn test_convert_failure_signals_nothing_to_delete() {
        let dir = tempfile::tempdir().unwrap();
        let job = ConversionJob::new(&dir.path().join("bad.mp3"), dir.path(), "bad");
        let (ctx, _converter) = context(
            MockConverter::new().fail_source("bad.mp3"),
            MockProbe::new(),
        );
        let pool = TaskPool::new(1).unwrap();
        let (tx, rx) = mpsc::channel();

        job.run(&ctx, &pool, &tx);
        pool.stop_wait();

        let signal = rx.recv().unwrap();
        assert_eq!(signal.outcome.status(), ConversionStatus::ConvertFailed);
        assert_eq!(signal.intermediate_to_delete(), None);
        assert!(!dir.path().join("bad.wav").exists(), "partial output left behind");
        assert_eq!(signal.to_report().source, "bad.mp3");
    }

    #[test]
    fn test_invalid_probe_duration_is_probe_failure() {
        let dir = tempfile::tempdir().unwrap();
        let job = ConversionJob::new(&dir.path().join("a.mp3"), dir.path(), "a");
        let (ctx, _converter) = context(
            MockConverter::new(),
            MockProbe::new().with_duration("a.wav", f64::NAN),
        );
        let pool = TaskPool::new(1).unwrap();

        let outcome = job.execute(&ctx, &pool);
        pool.stop_wait();

        assert_eq!(outcome.status(), ConversionStatus::ProbeFailed);
        // The converted file stays; only its duration is unknown.
        assert!(dir.path().join("a.wav").exists());
    }

    #[test]
    fn test_implausible_duration_is_probe_failure() {
        let dir = tempfile::tempdir().unwrap();
        let job = ConversionJob::new(&dir.path().join("a.mp3"), dir.path(), "a");
        let converter = Arc::new(MockConverter::new());
        let probe = Arc::new(MockProbe::new().with_duration("a.wav", 5.0e9));
        let ctx = JobContext {
            converter: converter.clone(),
            probe: probe.clone(),
            slicing: SliceParams {
                stride_secs: 1,
                len_secs: 1,
                short_threshold_secs: 1,
            },
        };
        let pool = TaskPool::new(1).unwrap();

        let outcome = job.execute(&ctx, &pool);
        pool.stop_wait();

        assert_eq!(outcome.status(), ConversionStatus::ProbeFailed);
        assert_eq!(outcome.intermediate_to_delete(), None);
        assert_eq!(converter.convert_count(), 1);
        assert_eq!(probe.probed(), vec![dir.path().join("a.wav")]);
        assert!(converter.slices().is_empty());
    }

    #[test]
    fn test_refused_slices_keep_intermediate() {
        let dir = tempfile::tempdir().unwrap();
        let job = ConversionJob::new(&dir.path().join("a.mp3"), dir.path(), "a");
        let (ctx, _converter) = context(
            MockConverter::new(),
            MockProbe::new().with_duration("a.wav", 6000.0),
        );
        let pool = TaskPool::new(1).unwrap();
        pool.stop_wait();

        let outcome = job.execute(&ctx, &pool);
        match &outcome {
            ConversionOutcome::Split {
                slices, complete, ..
            } => {
                assert_eq!(*slices, 0);
                assert!(!complete);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(outcome.intermediate_to_delete(), None);
    }
}
