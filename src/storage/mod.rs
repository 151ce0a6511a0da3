//! Object storage collaborator.
//!
//! The pipeline only needs three calls from a storage backend: put an
//! object, list keys under a prefix and get an object back. Uploading and
//! downloading local files are built on top of those.

pub mod local;

pub use local::LocalObjectStore;

use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Key/value object storage organised in buckets
pub trait ObjectStore {
    /// Store `bytes` under `bucket/key`, replacing any existing object
    fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<()>;

    /// Keys in `bucket` starting with `prefix`, sorted
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Contents of `bucket/key`
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Upload a local file
    fn upload_file(&self, local_path: &Path, bucket: &str, key: &str) -> Result<()> {
        let bytes = fs::read(local_path)?;
        debug!(
            "Uploading {} ({} bytes) to {}/{}",
            local_path.display(),
            bytes.len(),
            bucket,
            key
        );
        self.put(bucket, key, &bytes)
    }

    /// Download an object to a local file, creating parent directories
    fn download_file(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        let bytes = self.get(bucket, key)?;
        if let Some(parent) = local_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(local_path, &bytes)?;
        debug!(
            "Downloaded {}/{} ({} bytes) to {}",
            bucket,
            key,
            bytes.len(),
            local_path.display()
        );
        Ok(())
    }
}

/// Last path segment of a key (`raw/people.csv` → `people.csv`)
pub fn key_file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Join a prefix ending in `/` with a file name
pub fn object_key(prefix: &str, file_name: &str) -> String {
    format!("{}{}", prefix, file_name)
}
