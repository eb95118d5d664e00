// ============================================================================
// slicewav-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig with the library defaults for every field
// that is not set explicitly.

use std::path::PathBuf;

use super::{CoreConfig, ProbeKind, SliceParams};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use slicewav_core::config::{CoreConfigBuilder, ProbeKind};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .input_dir(PathBuf::from("/path/to/media"))
///     .output_dir(PathBuf::from("/path/to/wav"))
///     .log_dir(PathBuf::from("/path/to/logs"))
///     .worker_count(4)
///     .chunk_stride_secs(2700)
///     .chunk_len_secs(3000)
///     .probe(ProbeKind::Ffprobe)
///     .build();
/// assert_eq!(config.slicing.stride_secs, 2700);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    log_dir: Option<PathBuf>,

    worker_count: usize,
    slicing: SliceParams,
    probe: ProbeKind,
    ffmpeg_path: Option<PathBuf>,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfigBuilder {
    pub fn new() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            log_dir: None,
            worker_count: super::DEFAULT_WORKER_COUNT,
            slicing: SliceParams::default(),
            probe: ProbeKind::default(),
            ffmpeg_path: None,
        }
    }

    pub fn input_dir(mut self, input_dir: PathBuf) -> Self {
        self.input_dir = Some(input_dir);
        self
    }

    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = Some(output_dir);
        self
    }

    /// Sets the log directory. Defaults to `<output_dir>/logs`.
    pub fn log_dir(mut self, log_dir: PathBuf) -> Self {
        self.log_dir = Some(log_dir);
        self
    }

    pub fn worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn chunk_stride_secs(mut self, secs: u32) -> Self {
        self.slicing.stride_secs = secs;
        self
    }

    pub fn chunk_len_secs(mut self, secs: u32) -> Self {
        self.slicing.len_secs = secs;
        self
    }

    pub fn short_threshold_secs(mut self, secs: u32) -> Self {
        self.slicing.short_threshold_secs = secs;
        self
    }

    pub fn probe(mut self, probe: ProbeKind) -> Self {
        self.probe = probe;
        self
    }

    pub fn ffmpeg_path(mut self, path: PathBuf) -> Self {
        self.ffmpeg_path = Some(path);
        self
    }

    /// Builds the CoreConfig. Unset directories fall back to `.`; call
    /// [`CoreConfig::validate`] before using the result.
    pub fn build(self) -> CoreConfig {
        let output_dir = self.output_dir.unwrap_or_else(|| PathBuf::from("."));
        let log_dir = self.log_dir.unwrap_or_else(|| output_dir.join("logs"));

        CoreConfig {
            input_dir: self.input_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_dir,
            log_dir,
            worker_count: self.worker_count,
            slicing: self.slicing,
            probe: self.probe,
            ffmpeg_path: self.ffmpeg_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = CoreConfigBuilder::new()
            .output_dir(PathBuf::from("/tmp/out"))
            .build();
        assert_eq!(config.worker_count, super::super::DEFAULT_WORKER_COUNT);
        assert_eq!(config.slicing, SliceParams::default());
        assert_eq!(config.log_dir, PathBuf::from("/tmp/out/logs"));
        assert!(config.ffmpeg_path.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = CoreConfigBuilder::new()
            .input_dir(PathBuf::from("/in"))
            .output_dir(PathBuf::from("/out"))
            .log_dir(PathBuf::from("/logs"))
            .worker_count(2)
            .chunk_stride_secs(60)
            .chunk_len_secs(90)
            .short_threshold_secs(120)
            .probe(ProbeKind::Afinfo)
            .ffmpeg_path(PathBuf::from("/opt/ffmpeg"))
            .build();

        assert_eq!(config.input_dir, PathBuf::from("/in"));
        assert_eq!(config.log_dir, PathBuf::from("/logs"));
        assert_eq!(config.worker_count, 2);
        assert_eq!(
            config.slicing,
            SliceParams {
                stride_secs: 60,
                len_secs: 90,
                short_threshold_secs: 120
            }
        );
        assert_eq!(config.probe, ProbeKind::Afinfo);
        assert_eq!(config.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg")));
    }
}
