//! Error taxonomy for manifest generation.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that abort a manifest build.
///
/// Oversized files are not represented here: they are recorded as skipped decisions in the
/// [`crate::models::SizeReport`] and the build carries on.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// A glob pattern could not be compiled or points outside the build root.
  #[error("invalid glob pattern '{pattern}': {reason}")]
  InvalidPattern {
    /// Pattern as supplied by configuration.
    pattern: String,
    /// Human readable explanation of the failure.
    reason: String,
  },
  /// A directory below a pattern's literal prefix could not be listed.
  #[error("failed to walk {} while resolving '{pattern}': {source}", path.display())]
  Walk {
    /// Pattern being resolved.
    pattern: String,
    /// Directory that failed to list.
    path: PathBuf,
    /// Underlying traversal error.
    source: walkdir::Error,
  },
  /// A matched file could not be read.
  #[error("failed to read {}: {source}", path.display())]
  FileRead {
    /// File that could not be read.
    path: PathBuf,
    /// Underlying I/O error.
    source: std::io::Error,
  },
  /// A matched path has no UTF-8 form and cannot be written into the manifest.
  #[error("path is not valid UTF-8: {}", path.display())]
  NonUtf8Path {
    /// Offending path on disk.
    path: PathBuf,
  },
  /// The manifest could not be serialised.
  #[error("failed to serialise manifest: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Result alias used across the manifest pipeline.
pub type ManifestResult<T> = Result<T, ManifestError>;
