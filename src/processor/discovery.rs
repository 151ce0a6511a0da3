//! File discovery for raw record directories
//!
//! Lists the regular files of one directory (non-recursive) in a stable,
//! lexicographic order so that the merge result is deterministic.

use crate::error::{EtlError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// File discovery component for a raw record directory
#[derive(Debug)]
pub struct FileDiscovery {
    source_dir: PathBuf,
}

impl FileDiscovery {
    /// Create a new file discovery instance
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Discover all regular files directly inside the directory, sorted by name
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        if !self.source_dir.is_dir() {
            return Err(EtlError::SourceNotFound {
                path: self.source_dir.clone(),
            });
        }

        debug!("Listing files in: {}", self.source_dir.display());

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.source_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            // Follows symlinks, matching a plain "is this a file" check
            if entry.path().is_file() {
                files.push(entry.into_path());
            }
        }

        debug!(
            "Found {} files in {}",
            files.len(),
            self.source_dir.display()
        );

        Ok(files)
    }
}
