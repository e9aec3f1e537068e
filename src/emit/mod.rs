//! Artifact rendering and writing.
//!
//! Both emitters render into memory first. Files are only touched by
//! `write_artifact`, which creates parent directories and overwrites any
//! existing file.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::SeedError;

/// SQL seed migration emitter.
pub mod migration;
/// TypeScript data file emitter.
pub mod typescript;

/// A rendered output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Destination path.
    pub path: PathBuf,
    /// Full file contents.
    pub contents: String,
}

impl Artifact {
    /// Pair rendered `contents` with its destination.
    pub fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }
}

/// Write `artifact`, creating intermediate directories.
pub fn write_artifact(artifact: &Artifact) -> Result<(), SeedError> {
    ensure_parent(&artifact.path)?;
    fs::write(&artifact.path, artifact.contents.as_bytes())?;
    info!(
        path = %artifact.path.display(),
        bytes = artifact.contents.len(),
        "artifact written"
    );
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), SeedError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
