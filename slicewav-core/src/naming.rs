//! Output file naming contract.
//!
//! Converted files are `<base>.wav`; slices are `<base>-〖<index>〗.wav`. The
//! white lenticular brackets cannot collide with ordinary hyphenated source
//! names, and downstream tooling recovers a slice's position in the original
//! recording from the embedded index (see [`slice_offset`]).

use std::path::Path;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

/// Extension of every file the pipeline writes.
pub const OUTPUT_EXTENSION: &str = "wav";

/// Opening glyph around a slice index.
pub const SLICE_OPEN: char = '\u{3016}';

/// Closing glyph around a slice index.
pub const SLICE_CLOSE: char = '\u{3017}';

// Also accepts `<n>`, the form transcript files carry after renaming.
static SLICE_INDEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\x{3016}([0-9]+)\x{3017})|(?:<([0-9]+)>)").expect("valid regex"));

/// Source file name without its extension (`talk.final.mp3` -> `talk.final`).
#[must_use]
pub fn base_name(path: &Path) -> Option<String> {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}

/// Canonical converted file name for a base name.
#[must_use]
pub fn converted_name(base: &str) -> String {
    format!("{base}.{OUTPUT_EXTENSION}")
}

/// File name of slice `index` for a base name.
#[must_use]
pub fn slice_name(base: &str, index: u32) -> String {
    format!("{base}-{SLICE_OPEN}{index}{SLICE_CLOSE}.{OUTPUT_EXTENSION}")
}

/// Extracts the first bracketed slice index from a file name.
#[must_use]
pub fn slice_index(file_name: &str) -> Option<u32> {
    let caps = SLICE_INDEX_RE.captures(file_name)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

/// Offset of a slice within the original recording: `index * stride`.
/// Names without an index map to zero.
#[must_use]
pub fn slice_offset(file_name: &str, stride_secs: u32) -> Duration {
    slice_index(file_name)
        .map(|index| Duration::from_secs(u64::from(index) * u64::from(stride_secs)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_names() {
        assert_eq!(converted_name("lecture"), "lecture.wav");
        assert_eq!(slice_name("lecture", 0), "lecture-〖0〗.wav");
        assert_eq!(slice_name("my-talk", 12), "my-talk-〖12〗.wav");
    }

    #[test]
    fn test_base_name_strips_last_extension_only() {
        assert_eq!(base_name(&PathBuf::from("/in/a.b.mp3")).as_deref(), Some("a.b"));
        assert_eq!(base_name(&PathBuf::from("/in/noext")).as_deref(), Some("noext"));
        assert_eq!(base_name(&PathBuf::from("/")), None);
    }

    #[test]
    fn test_slice_index_round_trips_through_names() {
        assert_eq!(slice_index(&slice_name("clip", 7)), Some(7));
        assert_eq!(slice_index("clip.wav"), None);
        assert_eq!(slice_index("clip-〖x〗.wav"), None);
    }

    #[test]
    fn test_slice_offset() {
        let cases = [
            ("_04-22-_Original-Media_Clip-,3.json", 0),
            ("_04-22-_Original-Media_Clip-,5-<0>.json", 0),
            ("_04-22-_Original-Media_Clip-,5-<s>.json", 0),
            ("_04-22-_Original-Media_Clip-,5-<1>.json", 2700),
            ("_04-22-_Original-Media_Clip-,5-〖3〗.wav", 8100),
        ];
        for (name, secs) in cases {
            assert_eq!(slice_offset(name, 2700), Duration::from_secs(secs), "{name}");
        }
    }
}
