//! Artifact acquisition: URL download or local path.
//!
//! Webhook callers usually pass a storage URL for the current report;
//! local runs pass a file path. Downloads land in a named temp file
//! that is removed when the working copy is dropped, on success and
//! failure alike.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::CycleError;

/// A report workbook available on the local filesystem for the duration
/// of one cycle.
#[derive(Debug)]
pub enum WorkingCopy {
    /// Caller-owned local file; processed in place, never deleted.
    Local(PathBuf),
    /// Downloaded copy; deleted when dropped.
    Downloaded(NamedTempFile),
}

impl WorkingCopy {
    pub fn path(&self) -> &Path {
        match self {
            WorkingCopy::Local(path) => path,
            WorkingCopy::Downloaded(file) => file.path(),
        }
    }
}

/// Resolve `source` into a local working copy.
///
/// `http(s)://` sources are downloaded synchronously; anything else is
/// treated as a filesystem path and must already exist.
pub fn acquire(source: &str) -> Result<WorkingCopy, CycleError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        log::info!("downloading artifact from {}", source);
        let response = reqwest::blocking::get(source)
            .and_then(|r| r.error_for_status())
            .map_err(|e| CycleError::Download(e.to_string()))?;
        let bytes = response
            .bytes()
            .map_err(|e| CycleError::Download(e.to_string()))?;

        let mut file = tempfile::Builder::new()
            .prefix("statusbook-")
            .suffix(".xlsx")
            .tempfile()?;
        file.write_all(&bytes)?;
        file.flush()?;
        log::info!("downloaded {} bytes to {}", bytes.len(), file.path().display());
        return Ok(WorkingCopy::Downloaded(file));
    }

    let path = PathBuf::from(source);
    if !path.exists() {
        return Err(CycleError::ArtifactMissing(path));
    }
    Ok(WorkingCopy::Local(path))
}
