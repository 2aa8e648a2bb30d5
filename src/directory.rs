//! Directory model for the file dialog.
//!
//! Tracks the current directory and its immediate children. Every navigation
//! is a fresh enumeration taken at the moment the path changed; listings are
//! never diffed incrementally. Directories come first, then files, both in
//! the order the underlying filesystem query returns them; no sorting
//! guarantee is added.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// In-dialog navigation failure. Recoverable: the dialog stays open and the
/// previous directory state is kept.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("path does not exist: {0}")]
    Missing(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to read directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Snapshot of one directory: its path, children, and path decomposition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryState {
    /// The enumerated directory.
    pub current_path: PathBuf,
    /// Immediate child directories, in filesystem order.
    pub child_directories: Vec<String>,
    /// Immediate child files, in filesystem order.
    pub child_files: Vec<String>,
    /// `/`-delimited decomposition of `current_path`.
    pub path_segments: Vec<String>,
}

impl DirectoryState {
    /// Enumerate `path` into a fresh snapshot.
    ///
    /// Symlinks are classified by what they point at; entries whose metadata
    /// cannot be read are listed as files. Entry names are lossy UTF-8.
    pub fn read(path: &Path) -> Result<Self, NavigationError> {
        let metadata = fs::metadata(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                NavigationError::Missing(path.to_path_buf())
            } else {
                io_error(path, source)
            }
        })?;
        if !metadata.is_dir() {
            return Err(NavigationError::NotADirectory(path.to_path_buf()));
        }

        let mut child_directories = Vec::new();
        let mut child_files = Vec::new();
        for entry in fs::read_dir(path).map_err(|source| io_error(path, source))? {
            let entry = entry.map_err(|source| io_error(path, source))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = fs::metadata(entry.path())
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            if is_dir {
                child_directories.push(name);
            } else {
                child_files.push(name);
            }
        }

        log::debug!(
            "enumerated {}: {} directories, {} files",
            path.display(),
            child_directories.len(),
            child_files.len()
        );

        Ok(Self {
            current_path: path.to_path_buf(),
            child_directories,
            child_files,
            path_segments: split_segments(&path.to_string_lossy()),
        })
    }

    /// Path formed by the segments up to and including `index`, used when a
    /// header segment is clicked.
    pub fn prefix_path(&self, index: usize) -> PathBuf {
        let joined = self.path_segments[..=index.min(self.path_segments.len() - 1)].join("/");
        if joined.is_empty() {
            PathBuf::from("/")
        } else {
            PathBuf::from(joined)
        }
    }
}

/// Split a path string on `/`. The root path yields a single empty segment
/// so the header always has something to click.
fn split_segments(path: &str) -> Vec<String> {
    if path == "/" {
        return vec![String::new()];
    }
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    trimmed.split('/').map(str::to_string).collect()
}

fn io_error(path: &Path, source: io::Error) -> NavigationError {
    NavigationError::Io {
        path: path.to_path_buf(),
        source,
    }
}
