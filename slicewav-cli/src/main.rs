// slicewav-cli/src/main.rs
//
// Entry point for the slicewav command.
//
// Responsibilities:
// - Parsing the two directory arguments and options.
// - Validating the configuration and preparing the output directory.
// - Setting up file or console logging.
// - Running the pipeline with a terminal or JSON reporter.
// - Exit code 1 when setup fails; 0 once the run got going, even if some
//   files failed.

use clap::Parser;
use slicewav_cli::logging::{init_logging, level_for};
use slicewav_cli::{Cli, CliResult, build_config, prepare, run_pipeline};
use slicewav_core::reporting::{JsonReporter, Reporter, TerminalReporter};
use std::process;

fn run(cli: Cli) -> CliResult<()> {
    let config = build_config(&cli);
    prepare(&config)?;

    let log_dir = (!cli.no_log).then(|| config.log_dir.clone());
    // Console mirroring of log lines would interleave with JSON on stdout.
    let console = cli.verbose && !cli.progress_json;
    let log_file = init_logging(log_dir.as_deref(), level_for(cli.verbose), console)?;
    if let Some(path) = &log_file {
        log::info!("Logging to {}", path.display());
    }

    let reporter: Box<dyn Reporter> = if cli.progress_json {
        Box::new(JsonReporter::new())
    } else {
        Box::new(TerminalReporter::new())
    };

    let summary = run_pipeline(config, reporter.as_ref())?;
    if !summary.all_succeeded() {
        log::warn!("Some inputs did not produce output; see the log for details");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("{e}");
        eprintln!("ERROR: {e}");
        process::exit(1);
    }
}
