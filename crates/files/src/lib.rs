//! Deck file handling
//!
//! Reading skeleton and fragment sources, and writing assembled documents.
//!
//! ## Design Principles
//!
//! - Sources are read whole and must be UTF-8
//! - A target document is replaced atomically: the new content is written to a
//!   temporary file in the target's directory and renamed over the target only once
//!   fully written, so a failure never leaves a partial document behind
//! - Every written document is identified by the SHA-256 digest of its bytes, which
//!   makes byte-identical rebuilds easy to confirm
//!
//! ## Example Usage
//!
//! ```no_run
//! use deck_files::{read_text, write_atomic};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let skeleton = read_text(Path::new("skeleton.html"))?;
//! let written = write_atomic(Path::new("deck.html"), &skeleton)?;
//! println!("sha256 {}", written.sha256);
//! # Ok(())
//! # }
//! ```

mod files;

pub use files::{read_text, write_atomic, Sha256Digest, WrittenFile};

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// Path cannot be used as a write target
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Reading a source failed
    #[error("Failed to read {path}: {source}", path = path.display())]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the temporary file failed
    #[error("Failed to write {path}: {source}", path = path.display())]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Renaming the temporary file over the target failed
    #[error("Failed to replace {path}: {source}", path = path.display())]
    Persist {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for file operations.
pub type FilesResult<T> = Result<T, FilesError>;
