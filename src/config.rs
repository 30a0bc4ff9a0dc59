//! Project configuration describing where the built site lives and what to precache.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name searched for when discovering configuration in a directory.
pub const DEFAULT_CONFIG_FILE: &str = "precache.config.json";

/// Default per-file ceiling: 2 MiB.
pub const DEFAULT_MAXIMUM_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;

/// Per-file size ceiling for precached assets.
///
/// Guards against accidentally precaching a very large file. Files larger than the budget are
/// left out of the manifest without failing the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SizeBudget(pub u64);

impl SizeBudget {
  /// Returns `true` when a file of `size_bytes` may be precached.
  pub fn admits(self, size_bytes: u64) -> bool {
    size_bytes <= self.0
  }

  /// The ceiling in bytes.
  pub fn bytes(self) -> u64 {
    self.0
  }
}

impl Default for SizeBudget {
  fn default() -> Self {
    Self(DEFAULT_MAXIMUM_FILE_SIZE_BYTES)
  }
}

/// Discoverable configuration for a precache manifest build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PrecacheConfig {
  /// Directory holding the built static assets, relative to the configuration file.
  pub build_root: String,
  /// Ordered glob patterns, relative to the build root, selecting the files to precache.
  /// A file picked up by several patterns is only cached once.
  pub glob_patterns: Vec<String>,
  /// Largest file, in bytes, that may be precached.
  pub maximum_file_size_bytes: SizeBudget,
}

impl Default for PrecacheConfig {
  fn default() -> Self {
    Self {
      build_root: "dist".into(),
      glob_patterns: vec![
        "css/**.css".into(),
        "**.html".into(),
        "images/**.*".into(),
        "js/**.js".into(),
      ],
      maximum_file_size_bytes: SizeBudget::default(),
    }
  }
}

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the configuration file from disk.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse the JSON configuration.
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
}

impl PrecacheConfig {
  /// Load configuration from the provided directory.
  ///
  /// Defaults are only used when the configuration file is absent. A file that exists but
  /// cannot be read or parsed is an error, so a typo never silently changes what is cached.
  pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    match Self::from_path(&candidate) {
      Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
        tracing::debug!(path = %candidate.display(), "no configuration file, using defaults");
        Ok(Self::default())
      }
      result => result,
    }
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Build root resolved against the directory the configuration belongs to.
  pub fn build_root_path(&self, base_dir: &Path) -> PathBuf {
    base_dir.join(&self.build_root)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn budget_admits_files_up_to_the_limit() {
    let budget = SizeBudget(100);
    assert!(budget.admits(100));
    assert!(!budget.admits(101));
    assert_eq!(SizeBudget::default().bytes(), 2_097_152);
  }

  #[test]
  fn discover_defaults_when_file_is_missing() {
    let temp = tempdir().unwrap();
    assert_eq!(
      PrecacheConfig::discover(temp.path()).unwrap(),
      PrecacheConfig::default()
    );
  }

  #[test]
  fn discover_rejects_malformed_file_instead_of_defaulting() {
    let temp = tempdir().unwrap();
    fs::write(
      temp.path().join(DEFAULT_CONFIG_FILE),
      r#"{"glob_patterns": "js/*.js", "build_root": "public"}"#,
    )
    .unwrap();

    let err = PrecacheConfig::discover(temp.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  fn discover_reads_existing_file() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join(DEFAULT_CONFIG_FILE), r#"{"build_root": "public"}"#).unwrap();

    let config = PrecacheConfig::discover(temp.path()).unwrap();
    assert_eq!(config.build_root, "public");
  }

  #[test]
  fn from_path_reads_partial_configuration() {
    let temp = tempdir().unwrap();
    let path = temp.path().join(DEFAULT_CONFIG_FILE);
    fs::write(
      &path,
      r#"{"build_root": "public", "maximum_file_size_bytes": 1024}"#,
    )
    .unwrap();

    let config = PrecacheConfig::from_path(&path).unwrap();
    assert_eq!(config.build_root, "public");
    assert_eq!(config.maximum_file_size_bytes, SizeBudget(1024));
    assert_eq!(config.glob_patterns, PrecacheConfig::default().glob_patterns);
    assert_eq!(
      config.build_root_path(temp.path()),
      temp.path().join("public")
    );
  }

  #[test]
  fn from_path_reports_parse_errors() {
    let temp = tempdir().unwrap();
    let path = temp.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, r#"{"glob_patterns": "css/*.css"}"#).unwrap();

    let err = PrecacheConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  fn from_path_reports_missing_files() {
    let temp = tempdir().unwrap();
    let err = PrecacheConfig::from_path(&temp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
  }
}
