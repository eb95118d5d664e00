//! User-facing progress reporting.
//!
//! The pipeline reports lifecycle events through the [`Reporter`] trait and
//! never writes to the terminal itself. The CLI picks a human-readable
//! [`TerminalReporter`] or a machine-readable [`JsonReporter`].

pub mod summary;

pub use summary::RunSummary;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::utils::format_duration;

/// Run start metadata.
#[derive(Clone, Debug)]
pub struct RunStartInfo {
    pub input_dir: String,
    pub output_dir: String,
    pub worker_count: usize,
}

/// Result of planning against the output snapshot.
#[derive(Clone, Debug, Default)]
pub struct PlanSummary {
    pub inputs_found: usize,
    /// File names of inputs that will be converted.
    pub to_convert: Vec<String>,
    pub already_converted: usize,
    pub already_split: usize,
    pub duplicates: usize,
}

/// How a single conversion job ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionStatus {
    ConvertFailed,
    ProbeFailed,
    Short,
    Split,
}

impl ConversionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConvertFailed => "convert_failed",
            Self::ProbeFailed => "probe_failed",
            Self::Short => "short",
            Self::Split => "split",
        }
    }

    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::ConvertFailed | Self::ProbeFailed)
    }
}

/// Per-input completion details.
#[derive(Clone, Debug)]
pub struct ConversionReport {
    pub source: String,
    pub status: ConversionStatus,
    pub duration_secs: Option<f64>,
    pub slices: u32,
    pub message: Option<String>,
}

/// High-level warning/error message.
#[derive(Clone, Debug)]
pub struct ReporterError {
    pub title: String,
    pub message: String,
    pub context: Option<String>,
    pub suggestion: Option<String>,
}

/// Reporter interface implemented by both human-readable and JSON reporters.
pub trait Reporter: Send + Sync {
    fn run_started(&self, _info: &RunStartInfo) {}
    fn plan_ready(&self, _plan: &PlanSummary) {}
    fn conversion_finished(&self, _report: &ConversionReport) {}
    fn cleanup_failed(&self, _path: &str, _message: &str) {}
    fn run_complete(&self, _summary: &RunSummary) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _error: &ReporterError) {}
}

/// No-op reporter that discards all updates.
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Human-friendly reporter that prints concise text output.
pub struct TerminalReporter {
    progress: Mutex<Option<ProgressBar>>,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            progress: Mutex::new(None),
        }
    }

    fn start_progress(&self, total: usize) {
        self.finish_progress();
        if total == 0 {
            return;
        }
        let pb = ProgressBar::new(total as u64);
        let bar_style = ProgressStyle::default_bar()
            .template("Converting [{bar:40}] {pos}/{len} | {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        pb.set_style(bar_style);
        pb.enable_steady_tick(Duration::from_millis(120));
        *self.progress.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn finish_progress(&self) {
        if let Some(pb) = self
            .progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_and_clear();
        }
    }

    /// Prints above the bar when one is active.
    fn println(&self, line: String) {
        let guard = self.progress.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }
}

impl Reporter for TerminalReporter {
    fn run_started(&self, info: &RunStartInfo) {
        println!("\n{}", style("RUN").bold().cyan());
        println!("  {:<8} {}", style("Input:").bold(), info.input_dir);
        println!("  {:<8} {}", style("Output:").bold(), info.output_dir);
        println!("  {:<8} {}", style("Workers:").bold(), info.worker_count);
    }

    fn plan_ready(&self, plan: &PlanSummary) {
        println!("\n{}", style("PLAN").bold().cyan());
        println!(
            "  {} input files, {} to convert",
            plan.inputs_found,
            style(plan.to_convert.len().to_string()).bold()
        );
        if plan.already_converted + plan.already_split + plan.duplicates > 0 {
            println!(
                "  Skipped: {} already converted, {} already split, {} duplicate names",
                plan.already_converted, plan.already_split, plan.duplicates
            );
        }
        for (idx, name) in plan.to_convert.iter().enumerate() {
            println!("  {}. {}", idx + 1, name);
        }
        self.start_progress(plan.to_convert.len());
    }

    fn conversion_finished(&self, report: &ConversionReport) {
        let line = match report.status {
            ConversionStatus::Short => format!(
                "  {} {} ({})",
                style("✓").green(),
                report.source,
                report
                    .duration_secs
                    .map_or_else(String::new, format_duration)
            ),
            ConversionStatus::Split => format!(
                "  {} {} ({}, {} slices)",
                style("✓").green(),
                report.source,
                report
                    .duration_secs
                    .map_or_else(String::new, format_duration),
                report.slices
            ),
            status => format!(
                "  {} {} ({}){}",
                style("✗").red().bold(),
                report.source,
                status.as_str(),
                report
                    .message
                    .as_deref()
                    .map(|m| format!(": {m}"))
                    .unwrap_or_default()
            ),
        };
        self.println(line);

        if let Some(pb) = self
            .progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            pb.inc(1);
            pb.set_message(report.source.clone());
        }
    }

    fn cleanup_failed(&self, path: &str, message: &str) {
        self.println(format!(
            "  {} could not delete {}: {}",
            style("WARN:").yellow().bold(),
            path,
            message
        ));
    }

    fn run_complete(&self, summary: &RunSummary) {
        self.finish_progress();
        println!("\n{}", style("SUMMARY").bold().cyan());
        let headline = format!("{} of {} converted", summary.converted, summary.planned);
        if summary.all_succeeded() {
            println!("  {}", style(headline).green().bold());
        } else {
            println!("  {}", style(headline).yellow().bold());
        }
        println!(
            "  Short: {}, split: {} ({} slices), failed: {}",
            summary.short,
            summary.split,
            summary.slices_submitted,
            style(summary.failed.to_string()).red()
        );
        println!(
            "  Intermediates deleted: {}, cleanup failures: {}",
            summary.intermediates_deleted, summary.cleanup_failures
        );
        println!(
            "  Time: {}",
            format_duration(summary.elapsed.as_secs_f64())
        );
    }

    fn warning(&self, message: &str) {
        self.println(style(format!("WARN: {message}")).yellow().bold().to_string());
    }

    fn error(&self, error: &ReporterError) {
        self.finish_progress();
        eprintln!(
            "\n{} {}",
            style("ERROR").red().bold(),
            style(&error.title).red().bold()
        );
        eprintln!("  {}", error.message);
        if let Some(ctx) = &error.context {
            eprintln!("  Context: {ctx}");
        }
        if let Some(suggestion) = &error.suggestion {
            eprintln!("  Suggestion: {suggestion}");
        }
    }
}

/// Reporter emitting one JSON object per line.
pub struct JsonReporter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_value(&self, value: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{value}");
            let _ = writer.flush();
        }
    }
}

impl Reporter for JsonReporter {
    fn run_started(&self, info: &RunStartInfo) {
        self.write_value(json!({
            "type": "run_started",
            "input_dir": info.input_dir,
            "output_dir": info.output_dir,
            "worker_count": info.worker_count,
            "timestamp": Self::timestamp(),
        }));
    }

    fn plan_ready(&self, plan: &PlanSummary) {
        self.write_value(json!({
            "type": "plan_ready",
            "inputs_found": plan.inputs_found,
            "to_convert": plan.to_convert,
            "already_converted": plan.already_converted,
            "already_split": plan.already_split,
            "duplicates": plan.duplicates,
            "timestamp": Self::timestamp(),
        }));
    }

    fn conversion_finished(&self, report: &ConversionReport) {
        self.write_value(json!({
            "type": "conversion_finished",
            "source": report.source,
            "status": report.status.as_str(),
            "duration_seconds": report.duration_secs,
            "slices": report.slices,
            "message": report.message,
            "timestamp": Self::timestamp(),
        }));
    }

    fn cleanup_failed(&self, path: &str, message: &str) {
        self.write_value(json!({
            "type": "cleanup_failed",
            "path": path,
            "message": message,
            "timestamp": Self::timestamp(),
        }));
    }

    fn run_complete(&self, summary: &RunSummary) {
        let mut value = serde_json::to_value(summary).unwrap_or_else(|_| json!({}));
        if let Some(map) = value.as_object_mut() {
            map.insert("type".to_string(), json!("run_complete"));
            map.insert("timestamp".to_string(), json!(Self::timestamp()));
        }
        self.write_value(value);
    }

    fn warning(&self, message: &str) {
        self.write_value(json!({
            "type": "warning",
            "message": message,
            "timestamp": Self::timestamp(),
        }));
    }

    fn error(&self, error: &ReporterError) {
        self.write_value(json!({
            "type": "error",
            "title": error.title,
            "message": error.message,
            "context": error.context,
            "suggestion": error.suggestion,
            "timestamp": Self::timestamp(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn lines(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    #[test]
    fn test_json_reporter_emits_one_object_per_event() {
        let buf = SharedBuf::default();
        let reporter = JsonReporter::with_writer(Box::new(buf.clone()));

        reporter.plan_ready(&PlanSummary {
            inputs_found: 3,
            to_convert: vec!["a.mp3".to_string()],
            already_split: 2,
            ..Default::default()
        });
        reporter.conversion_finished(&ConversionReport {
            source: "a.mp3".to_string(),
            status: ConversionStatus::Split,
            duration_secs: Some(6000.0),
            slices: 3,
            message: None,
        });
        reporter.run_complete(&RunSummary {
            planned: 1,
            submitted: 1,
            converted: 1,
            split: 1,
            slices_submitted: 3,
            ..Default::default()
        });

        let lines = buf.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "plan_ready");
        assert_eq!(lines[0]["already_split"], 2);
        assert_eq!(lines[1]["status"], "split");
        assert_eq!(lines[1]["slices"], 3);
        assert_eq!(lines[2]["type"], "run_complete");
        assert_eq!(lines[2]["slices_submitted"], 3);
        assert!(lines[2]["timestamp"].is_u64());
    }

    #[test]
    fn test_status_failure_classification() {
        assert!(ConversionStatus::ConvertFailed.is_failure());
        assert!(ConversionStatus::ProbeFailed.is_failure());
        assert!(!ConversionStatus::Short.is_failure());
        assert!(!ConversionStatus::Split.is_failure());
    }
}
