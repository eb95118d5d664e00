//! Slice extraction from a converted intermediate.

use std::path::{Path, PathBuf};

use crate::config::SliceParams;
use crate::error::CoreResult;
use crate::external::Converter;
use crate::naming;

/// One time-bounded slice of an intermediate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitJob {
    pub intermediate: PathBuf,
    pub output_dir: PathBuf,
    pub base_name: String,
    pub index: u32,
}

impl SplitJob {
    pub fn new(intermediate: &Path, output_dir: &Path, base_name: &str, index: u32) -> Self {
        Self {
            intermediate: intermediate.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            base_name: base_name.to_string(),
            index,
        }
    }

    #[must_use]
    pub fn slice_name(&self) -> String {
        naming::slice_name(&self.base_name, self.index)
    }

    #[must_use]
    pub fn slice_path(&self) -> PathBuf {
        self.output_dir.join(self.slice_name())
    }

    /// Extracts the slice. A failure removes whatever partial file the
    /// converter left behind.
    pub fn execute(&self, converter: &dyn Converter, slicing: &SliceParams) -> CoreResult<()> {
        let dest = self.slice_path();
        let start_secs = slicing.slice_start_secs(self.index);
        log::debug!(
            "Slicing {} -> {} (start {}s, length {}s)",
            self.intermediate.display(),
            dest.display(),
            start_secs,
            slicing.len_secs
        );

        match converter.slice(&self.intermediate, &dest, start_secs, slicing.len_secs) {
            Ok(_) => {
                log::info!("Wrote slice {}", dest.display());
                Ok(())
            }
            Err(e) => {
                remove_partial(&dest);
                Err(e)
            }
        }
    }

    /// Runs the job on a worker. Failures are logged and go nowhere else.
    pub fn run(self, converter: &dyn Converter, slicing: &SliceParams) {
        if let Err(e) = self.execute(converter, slicing) {
            log::error!(
                "Slice {} of {} failed: {}",
                self.index,
                self.intermediate.display(),
                e
            );
            if let Some(output) = e.tool_output() {
                log::error!("Tool output:\n{output}");
            }
        }
    }
}

/// Best-effort removal of a half-written output.
pub(crate) fn remove_partial(path: &Path) {
    if !path.exists() {
        return;
    }
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("Removed partial output {}", path.display()),
        Err(e) => log::warn!("Failed to remove partial output {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::MockConverter;

    fn job(dir: &Path, index: u32) -> SplitJob {
        SplitJob::new(&dir.join("talk.wav"), dir, "talk", index)
    }

    #[test]
    fn test_slice_path() {
        let job = job(Path::new("/out"), 2);
        assert_eq!(job.slice_path(), PathBuf::from("/out/talk-〖2〗.wav"));
    }

    #[test]
    fn test_execute_uses_stride_and_length() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("talk.wav"), b"RIFF").unwrap();
        let converter = MockConverter::new();

        job(dir.path(), 2)
            .execute(&converter, &SliceParams::default())
            .unwrap();

        assert_eq!(
            converter.slices(),
            vec![("talk-〖2〗.wav".to_string(), 5400, true)]
        );
        assert!(dir.path().join("talk-〖2〗.wav").exists());
    }

    #[test]
    fn test_failed_slice_removes_partial() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("talk.wav"), b"RIFF").unwrap();
        let converter = MockConverter::new().fail_slice_at(2700);

        let result = job(dir.path(), 1).execute(&converter, &SliceParams::default());
        assert!(result.is_err());
        assert!(!dir.path().join("talk-〖1〗.wav").exists());

        // Fire-and-forget form swallows the error.
        job(dir.path(), 1).run(&converter, &SliceParams::default());
    }
}
