// slicewav-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, ValueEnum};
use slicewav_core::ProbeKind;
use slicewav_core::config::{
    DEFAULT_CHUNK_LEN_SECS, DEFAULT_CHUNK_STRIDE_SECS, DEFAULT_SHORT_THRESHOLD_SECS,
    DEFAULT_WORKER_COUNT,
};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "slicewav: Batch media to mono WAV slices",
    long_about = "Converts every file in INPUT_DIR to single-channel WAV in OUTPUT_DIR with ffmpeg, \
                  splitting long recordings into overlapping slices. Inputs that already have \
                  output are skipped, so the command can be re-run safely."
)]
pub struct Cli {
    /// Directory containing the media files to convert
    #[arg(required = true, value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory where converted files and slices are written
    #[arg(required = true, value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Number of worker threads
    #[arg(short, long, value_name = "COUNT", default_value_t = DEFAULT_WORKER_COUNT,
          value_parser = clap::value_parser!(usize))]
    pub workers: usize,

    /// Optional: Directory for log files (defaults to OUTPUT_DIR/logs)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log to the console only; no log file is written
    #[arg(long, default_value_t = false)]
    pub no_log: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Emit progress as JSON lines on stdout instead of terminal output
    #[arg(long, default_value_t = false)]
    pub progress_json: bool,

    /// Tool used to measure converted file durations
    #[arg(long, value_enum, default_value_t = ProbeArg::Auto)]
    pub probe: ProbeArg,

    /// Optional: Path to the ffmpeg binary (defaults to ffmpeg on PATH)
    #[arg(long, value_name = "PATH", env = "SLICEWAV_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Seconds between the starts of consecutive slices
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_CHUNK_STRIDE_SECS)]
    pub chunk_stride: u32,

    /// Length of each slice in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_CHUNK_LEN_SECS)]
    pub chunk_len: u32,

    /// Files at least this many seconds long are split
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_SHORT_THRESHOLD_SECS)]
    pub short_threshold: u32,
}

/// `--probe` values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProbeArg {
    /// afinfo on macOS, ffprobe elsewhere
    Auto,
    Afinfo,
    Ffprobe,
}

impl From<ProbeArg> for ProbeKind {
    fn from(arg: ProbeArg) -> Self {
        match arg {
            ProbeArg::Auto => ProbeKind::Auto,
            ProbeArg::Afinfo => ProbeKind::Afinfo,
            ProbeArg::Ffprobe => ProbeKind::Ffprobe,
        }
    }
}

impl Cli {
    /// Log directory, defaulting to `OUTPUT_DIR/logs`.
    #[must_use]
    pub fn effective_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("logs"))
    }
}
