//! Conversion pipeline.
//!
//! The controller in [`pipeline`] plans one [`ConversionJob`] per input that
//! still needs work and feeds them to the task pool. Each conversion job may
//! fan out into [`SplitJob`]s on the same pool once the converted file's
//! duration is known.

/// Worker-side conversion logic and completion signals
pub mod conversion;

/// Worker-side slice extraction
pub mod split;

/// Planning, execution and cleanup of a whole run
pub mod pipeline;

use std::sync::Arc;

use crate::config::SliceParams;
use crate::external::{Converter, DurationProbe};

pub use conversion::{CompletionSignal, ConversionJob, ConversionOutcome};
pub use pipeline::{Pipeline, PlanDecision, plan, plan_decisions};
pub use split::SplitJob;

/// Everything a worker needs to run either job kind.
#[derive(Clone)]
pub struct JobContext {
    pub converter: Arc<dyn Converter>,
    pub probe: Arc<dyn DurationProbe>,
    pub slicing: SliceParams,
}

impl std::fmt::Debug for JobContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobContext")
            .field("slicing", &self.slicing)
            .finish_non_exhaustive()
    }
}
