//! Implementation of the conversion run.
//!
//! Builds the core configuration from the arguments, prepares the output
//! directory, then plans and runs the pipeline. Tool binaries are only
//! checked once there is something to convert, so an up-to-date output
//! directory never needs ffmpeg installed.

use crate::cli::Cli;
use crate::error::{CliErrorContext, CliResult};

use slicewav_core::reporting::{Reporter, ReporterError, RunStartInfo};
use slicewav_core::{CoreConfig, CoreConfigBuilder, Pipeline, RunSummary};

use std::fs;

use log::{debug, info};

/// Creates the CoreConfig described by the command line.
#[must_use]
pub fn build_config(args: &Cli) -> CoreConfig {
    let mut builder = CoreConfigBuilder::new()
        .input_dir(args.input_dir.clone())
        .output_dir(args.output_dir.clone())
        .log_dir(args.effective_log_dir())
        .worker_count(args.workers)
        .chunk_stride_secs(args.chunk_stride)
        .chunk_len_secs(args.chunk_len)
        .short_threshold_secs(args.short_threshold)
        .probe(args.probe.into());
    if let Some(ffmpeg) = &args.ffmpeg {
        builder = builder.ffmpeg_path(ffmpeg.clone());
    }
    builder.build()
}

/// Validates the configuration and creates the output directory.
pub fn prepare(config: &CoreConfig) -> CliResult<()> {
    config.validate()?;
    fs::create_dir_all(&config.output_dir).cli_with_context(|| {
        format!(
            "Failed to create output directory '{}'",
            config.output_dir.display()
        )
    })?;
    Ok(())
}

/// Plans and runs the pipeline.
///
/// Errors are setup failures (directories, missing tools). Per-file failures
/// only show up in the returned summary.
pub fn run_pipeline(config: CoreConfig, reporter: &dyn Reporter) -> CliResult<RunSummary> {
    let pipeline = Pipeline::from_config(config);
    let config = pipeline.config();

    info!(
        "slicewav run started: {} -> {}",
        config.input_dir.display(),
        config.output_dir.display()
    );
    reporter.run_started(&RunStartInfo {
        input_dir: config.input_dir.display().to_string(),
        output_dir: config.output_dir.display().to_string(),
        worker_count: config.worker_count,
    });

    let jobs = pipeline.plan(reporter)?;
    if jobs.is_empty() {
        info!("Nothing to convert");
    } else {
        debug!("Checking external tools for {} job(s)", jobs.len());
        if let Err(e) = slicewav_core::check_dependencies(config) {
            reporter.error(&ReporterError {
                title: "Missing dependency".to_string(),
                message: e.to_string(),
                context: None,
                suggestion: Some(
                    "Install ffmpeg (and ffprobe), or point --ffmpeg at the binary".to_string(),
                ),
            });
            return Err(e);
        }
    }

    pipeline.run(jobs, reporter)
}
