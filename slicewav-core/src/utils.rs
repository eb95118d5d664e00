//! Utility functions for formatting and path handling.

use std::path::Path;

/// Formats seconds as HH:MM:SS (e.g., 3725.0 -> "01:02:05"). Returns "??:??:??" for invalid inputs.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 || !seconds.is_finite() {
        return "??:??:??".to_string();
    }

    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Safely extracts filename from a path with consistent error handling.
/// Returns the filename as a String, or an error if the path has no filename component.
pub fn get_filename_safe(path: &Path) -> crate::CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| {
            crate::CoreError::PathError(format!("Failed to get filename for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

/// File name for display, falling back to the full path.
#[must_use]
pub fn display_name(path: &Path) -> String {
    get_filename_safe(path).unwrap_or_else(|_| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(59.0), "00:00:59");
        assert_eq!(format_duration(3600.0), "01:00:00");
        assert_eq!(format_duration(6000.0), "01:40:00");
        assert_eq!(format_duration(90061.0), "25:01:01");

        // Fractional seconds truncate
        assert_eq!(format_duration(59.9), "00:00:59");

        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::INFINITY), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_get_filename_safe() {
        assert_eq!(
            get_filename_safe(Path::new("/out/talk-〖1〗.wav")).unwrap(),
            "talk-〖1〗.wav"
        );
        assert!(get_filename_safe(Path::new("/")).is_err());
        assert_eq!(display_name(Path::new("/")), "/");
    }
}
