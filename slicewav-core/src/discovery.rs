//! Directory scanning for a pipeline run.
//!
//! Input discovery lists every regular, non-hidden file at the top level of the
//! input directory. Output discovery takes a single snapshot of the `.wav`
//! names already present in the output directory; every skip decision of a run
//! is made against that snapshot.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::naming::OUTPUT_EXTENSION;

/// Immutable snapshot of the file names present in the output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputState {
    names: HashSet<String>,
}

impl OutputState {
    /// Builds a snapshot from file names (not paths).
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn read_dir_checked(dir: &Path) -> CoreResult<std::fs::ReadDir> {
    if !dir.is_dir() {
        return Err(CoreError::PathError(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    std::fs::read_dir(dir).map_err(|e| {
        CoreError::PathError(format!("Cannot read directory {}: {}", dir.display(), e))
    })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Lists the files to consider for conversion, sorted by file name.
///
/// Directories and hidden files are skipped. An unreadable directory is an
/// error; unreadable individual entries are logged and skipped.
pub fn find_input_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let read_dir = read_dir_checked(input_dir)?;

    let mut files = Vec::new();
    for entry in read_dir {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if !path.is_file() || is_hidden(&path) {
                    continue;
                }
                files.push(path);
            }
            Err(e) => {
                log::warn!(
                    "Failed to read directory entry in {}: {}",
                    input_dir.display(),
                    e
                );
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::debug!(
        "Found {} input file(s) in {}",
        files.len(),
        input_dir.display()
    );
    Ok(files)
}

/// Snapshots the `.wav` file names currently in the output directory.
pub fn scan_output_state(output_dir: &Path) -> CoreResult<OutputState> {
    let read_dir = read_dir_checked(output_dir)?;

    let mut names = HashSet::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| {
            CoreError::PathError(format!(
                "Failed to read entry in {}: {}",
                output_dir.display(),
                e
            ))
        })?;
        let path = entry.path();
        let is_wav = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == OUTPUT_EXTENSION);
        if !is_wav {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.insert(name.to_string());
        }
    }

    log::debug!(
        "Output snapshot of {} holds {} file(s)",
        output_dir.display(),
        names.len()
    );
    Ok(OutputState { names })
}
