//! Filesystem-backed object store.
//!
//! A bucket is a directory under the store root and a key is a relative
//! path inside it:
//!
//! ```text
//! root/
//!   bucket/
//!     raw/people.csv
//!     transformed/transformed_output.csv
//!     logs/etl_pipeline.log
//! ```

use super::ObjectStore;
use crate::error::{EtlError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Object store kept in a local directory
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
            return Err(EtlError::Configuration {
                message: format!("Invalid bucket name '{}'", bucket),
            });
        }
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.bucket_dir(bucket)?.join(key))
    }
}

/// Keys are relative, `/`-separated, with no empty, `.` or `..` segments
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(EtlError::invalid_key(key, "key is empty"));
    }
    if key.starts_with('/') || key.contains('\\') {
        return Err(EtlError::invalid_key(key, "key must be a relative path"));
    }
    for segment in key.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(EtlError::invalid_key(key, "key has an empty or relative segment"));
        }
    }
    Ok(())
}

/// Relative path under the bucket rendered as a key
fn path_to_key(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?.to_string()),
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

impl ObjectStore for LocalObjectStore {
    fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        debug!("Stored {}/{} at {}", bucket, key, path.display());
        Ok(())
    }

    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let bucket_dir = self.bucket_dir(bucket)?;
        if !bucket_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&bucket_dir).min_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&bucket_dir) else {
                continue;
            };
            if let Some(key) = path_to_key(relative) {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        if !path.is_file() {
            return Err(EtlError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }
        Ok(fs::read(&path)?)
    }
}
