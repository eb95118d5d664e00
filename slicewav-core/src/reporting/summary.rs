//! Summary reporting module
//!
//! Aggregate counters for one pipeline run, filled in by the controller as
//! completion signals arrive and handed to the reporter at the end.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::utils::format_duration;

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Outcome counts of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Conversion jobs handed to `run`
    pub planned: usize,

    /// Jobs actually accepted by the task pool
    pub submitted: usize,

    /// Jobs whose conversion succeeded (`short + split`)
    pub converted: usize,

    /// Converted files below the split threshold, kept as-is
    pub short: usize,

    /// Converted files that were fanned out into slices
    pub split: usize,

    /// Jobs that produced no output (conversion or probe failure)
    pub failed: usize,

    /// Split jobs submitted across all conversions
    pub slices_submitted: usize,

    /// Intermediate files removed after the drain
    pub intermediates_deleted: usize,

    /// Intermediate files that could not be removed
    pub cleanup_failures: usize,

    #[serde(rename = "elapsed_seconds", serialize_with = "as_secs")]
    pub elapsed: Duration,
}

impl RunSummary {
    /// True when every planned input produced output and cleanup succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.cleanup_failures == 0 && self.submitted == self.planned
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} converted ({} short, {} split into {} slices), {} failed, {} intermediates deleted, {} cleanup failures in {}",
            self.converted,
            self.planned,
            self.short,
            self.split,
            self.slices_submitted,
            self.failed,
            self.intermediates_deleted,
            self.cleanup_failures,
            format_duration(self.elapsed.as_secs_f64())
        )
    }
}
