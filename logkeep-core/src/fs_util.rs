//! Shared file helpers. All rewrites go through a sibling temp file and an
//! atomic rename so a crashed or racing writer never leaves a half-written
//! log or config file behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::errors::{CoreError, Result};

/// Read a file that must already exist. Missing files are `NotFound`,
/// everything else `Unreadable` - never an empty-success.
pub fn read_existing(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CoreError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| CoreError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace a file's content atomically (temp file in the same directory,
/// then rename over the target).
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write_failure = |source: std::io::Error| CoreError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failure)?;
    tmp.write_all(content.as_bytes()).map_err(write_failure)?;
    tmp.persist(path).map_err(|e| write_failure(e.error))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "rewrote file");
    Ok(())
}
