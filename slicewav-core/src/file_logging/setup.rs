use chrono::Local;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::path::{Path, PathBuf};
use anyhow::Result;

/// `slicewav_run_<YYYYMMDD_HHMMSS>.log` inside `log_dir`.
pub fn run_log_path(log_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    log_dir.join(format!("slicewav_run_{timestamp}.log"))
}

/// Installs log4rs as the global logger, writing to `log_file` and, when
/// `console` is set, to stderr as well.
pub fn setup_file_logging(log_file: &Path, log_level: LevelFilter, console: bool) -> Result<()> {
    // Create log directory if it doesn't exist
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // File appender with clean format for log files
    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}"
        )))
        .build(log_file)?;

    let mut builder = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)));
    let mut root = Root::builder().appender("file");

    if console {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new("[{h({l})}] {m}{n}")))
            .build();
        builder = builder.appender(Appender::builder().build("console", Box::new(stderr)));
        root = root.appender("console");
    }

    let config = builder.build(root.build(log_level))?;
    log4rs::init_config(config)?;

    Ok(())
}
