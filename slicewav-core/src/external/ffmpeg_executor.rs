// ============================================================================
// slicewav-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: Conversion and slicing through ffmpeg-sidecar
//
// Builds the two ffmpeg invocations the pipeline needs (mono downmix to WAV,
// and time-bounded extraction of a slice), runs them to completion and keeps
// the tool's full stderr log so failures can be reported verbatim.

use std::path::{Path, PathBuf};

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;

use super::Converter;
use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};

/// [`Converter`] backed by the ffmpeg binary.
#[derive(Debug, Clone, Default)]
pub struct SidecarConverter {
    ffmpeg_path: Option<PathBuf>,
}

impl SidecarConverter {
    /// `ffmpeg_path` of `None` lets ffmpeg-sidecar locate the binary.
    pub fn new(ffmpeg_path: Option<PathBuf>) -> Self {
        Self { ffmpeg_path }
    }

    fn command(&self) -> FfmpegCommand {
        let mut cmd = match &self.ffmpeg_path {
            Some(path) => FfmpegCommand::new_with_path(path),
            None => FfmpegCommand::new(),
        };
        cmd.arg("-hide_banner");
        // Never stop on an overwrite prompt; stale slices from an interrupted
        // run are replaced.
        cmd.arg("-y");
        cmd
    }

    /// Runs `cmd` to completion, returning the collected log lines.
    fn run(&self, label: &str, mut cmd: FfmpegCommand) -> CoreResult<String> {
        log::debug!("Running {label}: {:?}", cmd.as_inner());

        let mut child = cmd.spawn().map_err(|e| command_start_error(label, e))?;

        let mut output = String::new();
        let events = child.iter().map_err(|e| {
            command_failed_error(
                label,
                std::process::ExitStatus::default(),
                format!("Failed to read ffmpeg output: {e}"),
            )
        })?;
        for event in events {
            match event {
                FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) => {
                    output.push_str(&line);
                    output.push('\n');
                }
                _ => {}
            }
        }

        let status = child.wait().map_err(|e| command_wait_error(label, e))?;
        if status.success() {
            Ok(output)
        } else {
            Err(command_failed_error(label, status, output))
        }
    }

    // Paths go through `arg` as OS strings so non-UTF-8 names survive.
    fn convert_command(&self, source: &Path, dest: &Path) -> FfmpegCommand {
        let mut cmd = self.command();
        cmd.arg("-i").arg(source);
        // Downmix to mono.
        cmd.args(["-ac", "1"]);
        cmd.arg(dest);
        cmd
    }

    fn slice_command(
        &self,
        source: &Path,
        dest: &Path,
        start_secs: u64,
        len_secs: u32,
    ) -> FfmpegCommand {
        let mut cmd = self.command();
        // Seek before -i so ffmpeg skips straight to the offset.
        cmd.arg("-ss");
        cmd.arg(start_secs.to_string());
        cmd.arg("-t");
        cmd.arg(len_secs.to_string());
        cmd.arg("-i").arg(source);
        cmd.arg(dest);
        cmd
    }
}

impl Converter for SidecarConverter {
    fn convert(&self, source: &Path, dest: &Path) -> CoreResult<String> {
        self.run("ffmpeg (convert)", self.convert_command(source, dest))
    }

    fn slice(
        &self,
        source: &Path,
        dest: &Path,
        start_secs: u64,
        len_secs: u32,
    ) -> CoreResult<String> {
        let cmd = self.slice_command(source, dest, start_secs, len_secs);
        self.run("ffmpeg (slice)", cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args_of(cmd: &mut FfmpegCommand) -> Vec<&OsStr> {
        cmd.as_inner().get_args().collect()
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_reach_ffmpeg_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let source = Path::new(OsStr::from_bytes(b"/in/caf\xe9.mp3"));
        let dest = Path::new(OsStr::from_bytes(b"/out/caf\xe9.wav"));
        let converter = SidecarConverter::default();

        let mut convert = converter.convert_command(source, dest);
        let args = args_of(&mut convert);
        assert!(args.windows(2).any(|w| w == [OsStr::new("-i"), source.as_os_str()]));
        assert!(args.windows(3).any(|w| w == [OsStr::new("-ac"), OsStr::new("1"), dest.as_os_str()]));

        let mut slice = converter.slice_command(source, dest, 2700, 3000);
        let args = args_of(&mut slice);
        assert!(args.windows(4).any(|w| w
            == [
                OsStr::new("-ss"),
                OsStr::new("2700"),
                OsStr::new("-t"),
                OsStr::new("3000")
            ]));
        assert!(args.windows(3).any(|w| w == [OsStr::new("-i"), source.as_os_str(), dest.as_os_str()]));
        assert!(args.contains(&OsStr::new("-y")));
    }

    #[test]
    fn test_missing_binary_is_start_error() {
        let converter = SidecarConverter::new(Some(PathBuf::from(
            "/nonexistent/slicewav-test/ffmpeg",
        )));
        let err = converter
            .convert(Path::new("in.mp3"), Path::new("out.wav"))
            .unwrap_err();
        assert!(matches!(err, crate::CoreError::CommandStart(..)), "{err:?}");
    }
}
