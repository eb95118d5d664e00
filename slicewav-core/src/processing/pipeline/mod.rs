//! Pipeline controller.
//!
//! Two synchronization mechanisms are in play and stay separate:
//!
//! 1. a completion channel carrying exactly one [`CompletionSignal`] per
//!    submitted conversion job, and
//! 2. the task pool's drain barrier ([`TaskPool::stop_wait`]), which also
//!    covers split jobs submitted by running conversions.
//!
//! A conversion job submits its split jobs before it signals, so once every
//! signal has been received no further submissions can happen and draining
//! the pool is safe. Intermediates are deleted only after the drain.

mod plan;


pub use plan::{PlanDecision, plan, plan_decisions, scan_and_decide};

use std::sync::Arc;
use std::sync::mpsc;
use std::time::Instant;

use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::external::{self, Converter, DurationProbe};
use crate::processing::{CompletionSignal, ConversionJob, ConversionOutcome, JobContext};
use crate::reporting::{Reporter, RunStartInfo, RunSummary};
use crate::util::TaskPool;

/// Runs conversion jobs for one input/output directory pair.
pub struct Pipeline {
    config: CoreConfig,
    ctx: JobContext,
}

impl Pipeline {
    pub fn new(
        config: CoreConfig,
        converter: Arc<dyn Converter>,
        probe: Arc<dyn DurationProbe>,
    ) -> Self {
        let ctx = JobContext {
            converter,
            probe,
            slicing: config.slicing,
        };
        Self { config, ctx }
    }

    /// Pipeline using ffmpeg and the configured duration probe.
    pub fn from_config(config: CoreConfig) -> Self {
        let converter = external::converter_for(&config);
        let probe = external::probe_for(&config);
        Self::new(config, converter, probe)
    }

    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Plans against the configured directories and reports the result.
    pub fn plan(&self, reporter: &dyn Reporter) -> CoreResult<Vec<ConversionJob>> {
        let decisions = scan_and_decide(&self.config.input_dir, &self.config.output_dir)?;
        let summary = plan::summarize(&decisions);
        log::info!(
            "Planned {} of {} input(s): {} already converted, {} already split, {} duplicate(s)",
            summary.to_convert.len(),
            summary.inputs_found,
            summary.already_converted,
            summary.already_split,
            summary.duplicates
        );
        for warning in decisions.iter().filter_map(PlanDecision::warning) {
            reporter.warning(&warning);
        }
        reporter.plan_ready(&summary);
        Ok(plan::jobs_of(decisions))
    }

    /// Executes `jobs`, waits for every conversion and slice, then deletes
    /// the intermediates that were split.
    ///
    /// Only pool construction can fail; per-file problems are counted in the
    /// returned summary.
    pub fn run(&self, jobs: Vec<ConversionJob>, reporter: &dyn Reporter) -> CoreResult<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary {
            planned: jobs.len(),
            ..Default::default()
        };

        let pool = TaskPool::new(self.config.worker_count)?;
        let (tx, rx) = mpsc::channel::<CompletionSignal>();

        for job in jobs {
            let source = job.source.clone();
            let ctx = self.ctx.clone();
            let worker_pool = pool.clone();
            let completions = tx.clone();
            match pool.submit(move || job.run(&ctx, &worker_pool, &completions)) {
                Ok(()) => summary.submitted += 1,
                Err(e) => {
                    log::error!("Could not submit {}: {}", source.display(), e);
                    summary.failed += 1;
                }
            }
        }
        // Only worker-held senders remain, so a job that dies without
        // signalling ends the receive loop instead of hanging it.
        drop(tx);

        let mut to_delete = Vec::new();
        let mut received = 0;
        while received < summary.submitted {
            let Ok(signal) = rx.recv() else {
                log::error!(
                    "Completion channel closed after {} of {} signals",
                    received,
                    summary.submitted
                );
                summary.failed += summary.submitted - received;
                break;
            };
            received += 1;
            record(&mut summary, &signal.outcome);
            if let Some(path) = signal.intermediate_to_delete() {
                to_delete.push(path.to_path_buf());
            }
            reporter.conversion_finished(&signal.to_report());
        }
        log::debug!("Received {received} completion signal(s); draining pool");

        pool.stop_wait();

        for path in to_delete {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    log::info!("Deleted intermediate {}", path.display());
                    summary.intermediates_deleted += 1;
                }
                Err(e) => {
                    log::warn!("Failed to delete intermediate {}: {}", path.display(), e);
                    summary.cleanup_failures += 1;
                    reporter.cleanup_failed(&path.display().to_string(), &e.to_string());
                }
            }
        }

        summary.elapsed = started.elapsed();
        log::info!("Run complete: {summary}");
        reporter.run_complete(&summary);
        Ok(summary)
    }

    /// Plans and runs in one go.
    pub fn process_directories(&self, reporter: &dyn Reporter) -> CoreResult<RunSummary> {
        reporter.run_started(&RunStartInfo {
            input_dir: self.config.input_dir.display().to_string(),
            output_dir: self.config.output_dir.display().to_string(),
            worker_count: self.config.worker_count,
        });
        let jobs = self.plan(reporter)?;
        self.run(jobs, reporter)
    }
}

fn record(summary: &mut RunSummary, outcome: &ConversionOutcome) {
    match outcome {
        ConversionOutcome::ConvertFailed { .. } | ConversionOutcome::ProbeFailed { .. } => {
            summary.failed += 1;
        }
        ConversionOutcome::Short { .. } => {
            summary.converted += 1;
            summary.short += 1;
        }
        ConversionOutcome::Split { slices, .. } => {
            summary.converted += 1;
            summary.split += 1;
            summary.slices_submitted += *slices as usize;
        }
    }
}
