//! Source reads and atomic document writes
//!
//! # Atomic replacement
//!
//! [`write_atomic`] never writes to the target path directly:
//!
//! ```text
//! <target_dir>/
//! ├── .deck-XXXXXX.tmp   # created, written and synced first
//! └── deck.html          # replaced by rename only after the write succeeded
//! ```
//!
//! The temporary file lives in the target's own directory so the final rename stays on
//! one filesystem. If anything fails before the rename the temporary file is removed
//! and the target keeps its previous content (or stays absent).

use crate::{FilesError, FilesResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Lowercase hexadecimal SHA-256 digest of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a document was written, and what it contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub sha256: Sha256Digest,
    pub size_bytes: u64,
}

/// Reads a UTF-8 text file.
///
/// # Errors
///
/// Returns [`FilesError::Read`] if the file is missing, unreadable or not UTF-8.
pub fn read_text(path: &Path) -> FilesResult<String> {
    fs::read_to_string(path).map_err(|source| FilesError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces `target` with `contents` atomically.
///
/// # Errors
///
/// Returns `FilesError` if:
/// - `target` has no file name or its directory does not exist
/// - the temporary file cannot be created, written or synced
/// - the final rename fails
pub fn write_atomic(target: &Path, contents: &str) -> FilesResult<WrittenFile> {
    if target.file_name().is_none() {
        return Err(FilesError::InvalidPath(format!(
            "Target has no file name: {}",
            target.display()
        )));
    }

    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !directory.is_dir() {
        return Err(FilesError::InvalidPath(format!(
            "Directory does not exist: {}",
            directory.display()
        )));
    }

    let write_err = |source| FilesError::Write {
        path: target.to_path_buf(),
        source,
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".deck-")
        .suffix(".tmp")
        .tempfile_in(directory)
        .map_err(write_err)?;
    temp.write_all(contents.as_bytes()).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;

    temp.persist(target).map_err(|e| FilesError::Persist {
        path: target.to_path_buf(),
        source: e.error,
    })?;

    let written = WrittenFile {
        path: target.to_path_buf(),
        sha256: Sha256Digest::of(contents.as_bytes()),
        size_bytes: contents.len() as u64,
    };
    tracing::debug!(
        "wrote {} bytes to {} (sha256 {})",
        written.size_bytes,
        written.path.display(),
        written.sha256
    );
    Ok(written)
}
