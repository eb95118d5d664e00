//! Deciding which inputs need work.
//!
//! Every decision of a run is made against one [`OutputState`] snapshot taken
//! before anything is submitted.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::discovery::{OutputState, find_input_files, scan_output_state};
use crate::error::CoreResult;
use crate::naming;
use crate::processing::ConversionJob;
use crate::reporting::PlanSummary;
use crate::utils::display_name;

/// What planning decided for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanDecision {
    Convert(ConversionJob),
    /// Slice 0 exists; the input was split by an earlier run. `interrupted`
    /// is set when the intermediate is still there too.
    AlreadySplit { source: PathBuf, interrupted: bool },
    /// The converted file exists and was short enough to keep.
    AlreadyConverted { source: PathBuf },
    /// Another input with the same base name was planned first.
    DuplicateBaseName { source: PathBuf, base_name: String },
}

impl PlanDecision {
    #[must_use]
    pub fn job(&self) -> Option<&ConversionJob> {
        match self {
            Self::Convert(job) => Some(job),
            _ => None,
        }
    }

    /// Operator-facing warning for skips that may need attention.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::DuplicateBaseName { source, base_name } => Some(format!(
                "Skipping {}: base name '{}' is already used by another input",
                source.display(),
                base_name
            )),
            Self::AlreadySplit {
                source,
                interrupted: true,
            } => Some(format!(
                "{}: slice 0 and the converted file both exist; a previous run was interrupted and the slice set may be incomplete. Delete the slices to redo it.",
                source.display()
            )),
            _ => None,
        }
    }
}

/// Decides each input against the output snapshot. Pure; touches no files.
///
/// `inputs` should be sorted so that duplicate resolution is deterministic.
pub fn plan_decisions(
    inputs: &[PathBuf],
    state: &OutputState,
    output_dir: &Path,
) -> Vec<PlanDecision> {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut decisions = Vec::with_capacity(inputs.len());

    for source in inputs {
        let Some(base_name) = naming::base_name(source) else {
            log::warn!("Skipping {}: no usable file name", source.display());
            continue;
        };

        let marker = naming::slice_name(&base_name, 0);
        let converted = naming::converted_name(&base_name);

        let decision = if !claimed.insert(base_name.clone()) {
            PlanDecision::DuplicateBaseName {
                source: source.clone(),
                base_name,
            }
        } else if state.contains(&marker) {
            log::debug!("Skipping {}: {} already exists", source.display(), marker);
            PlanDecision::AlreadySplit {
                source: source.clone(),
                interrupted: state.contains(&converted),
            }
        } else if state.contains(&converted) {
            log::debug!("Skipping {}: {} already exists", source.display(), converted);
            PlanDecision::AlreadyConverted {
                source: source.clone(),
            }
        } else {
            PlanDecision::Convert(ConversionJob::new(source, output_dir, &base_name))
        };

        if let Some(warning) = decision.warning() {
            log::warn!("{warning}");
        }
        decisions.push(decision);
    }

    decisions
}

/// Scans both directories and decides every input.
pub fn scan_and_decide(input_dir: &Path, output_dir: &Path) -> CoreResult<Vec<PlanDecision>> {
    let inputs = find_input_files(input_dir)?;
    let state = scan_output_state(output_dir)?;
    Ok(plan_decisions(&inputs, &state, output_dir))
}

/// Conversion jobs for every input in `input_dir` that still needs work.
///
/// Failure to enumerate either directory is an error; nothing is planned.
pub fn plan(input_dir: &Path, output_dir: &Path) -> CoreResult<Vec<ConversionJob>> {
    Ok(jobs_of(scan_and_decide(input_dir, output_dir)?))
}

pub(crate) fn jobs_of(decisions: Vec<PlanDecision>) -> Vec<ConversionJob> {
    decisions
        .into_iter()
        .filter_map(|d| match d {
            PlanDecision::Convert(job) => Some(job),
            _ => None,
        })
        .collect()
}

/// Counts for the reporter.
pub(crate) fn summarize(decisions: &[PlanDecision]) -> PlanSummary {
    let mut summary = PlanSummary {
        inputs_found: decisions.len(),
        ..Default::default()
    };
    for decision in decisions {
        match decision {
            PlanDecision::Convert(job) => summary.to_convert.push(display_name(&job.source)),
            PlanDecision::AlreadySplit { .. } => summary.already_split += 1,
            PlanDecision::AlreadyConverted { .. } => summary.already_converted += 1,
            PlanDecision::DuplicateBaseName { .. } => summary.duplicates += 1,
        }
    }
    summary
}
