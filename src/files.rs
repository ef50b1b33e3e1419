//! Whole-file I/O shared by the directory tools.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::container::{try_decode, Container, ContainerError};
use crate::record::RecordError;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("{}: {source}", .path.display())]
    Container { path: PathBuf, source: ContainerError },
    #[error("{}: {source}", .path.display())]
    Record { path: PathBuf, source: RecordError },
    #[error("{}: payload is not a JSON object", .0.display())]
    NotAnObject(PathBuf),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        ToolError::Io { path: path.to_owned(), source }
    }

    pub fn container(path: &Path, source: ContainerError) -> Self {
        ToolError::Container { path: path.to_owned(), source }
    }

    pub fn record(path: &Path, source: RecordError) -> Self {
        ToolError::Record { path: path.to_owned(), source }
    }
}

/// Outcome of a directory-wide operation.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: usize,
    /// Files without the container marker.
    pub skipped: usize,
    /// Files that failed; their siblings are unaffected.
    pub failures: Vec<ToolError>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn read(path: &Path) -> Result<Vec<u8>, ToolError> {
    fs::read(path).map_err(|e| ToolError::io(path, e))
}

pub fn write(path: &Path, bytes: &[u8]) -> Result<(), ToolError> {
    fs::write(path, bytes).map_err(|e| ToolError::io(path, e))
}

pub fn create_dir_all(path: &Path) -> Result<(), ToolError> {
    fs::create_dir_all(path).map_err(|e| ToolError::io(path, e))
}

/// Regular files directly inside `dir`, sorted by name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ToolError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ToolError::io(dir, e))? {
        let entry = entry.map_err(|e| ToolError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read and decode `path`; `Ok(None)` when it is not a container.
pub fn load_container(path: &Path) -> Result<Option<Container>, ToolError> {
    let bytes = read(path)?;
    try_decode(&bytes).map_err(|e| ToolError::container(path, e))
}

/// File name of `path` as an owned string, lossy.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
