//! Precache build orchestrator turning configuration into ready-to-embed artifacts.

use std::path::{Path, PathBuf};

use crate::config::PrecacheConfig;
use crate::errors::ManifestResult;
use crate::manifest::{ManifestBuild, build_manifest};
use crate::models::{Manifest, SizeReport};

/// Artifacts handed to the template renderer.
#[derive(Debug, Clone)]
pub struct PrecacheArtifacts {
  /// Canonically ordered manifest.
  pub manifest: Manifest,
  /// Manifest serialised as a compact array of `[path, hash]` pairs.
  pub manifest_json: String,
  /// Per-file accept/skip decisions and the accepted size total.
  pub report: SizeReport,
}

impl PrecacheArtifacts {
  /// Returns `true` when `previous_json` is not the literal this build would embed.
  ///
  /// Trailing whitespace, such as the newline a file writer appends, is ignored.
  pub fn differs_from(&self, previous_json: &str) -> bool {
    previous_json.trim_end() != self.manifest_json
  }
}

/// High-level helper for generating a precache manifest from configuration.
pub struct PrecacheBuilder<'a> {
  config: &'a PrecacheConfig,
  build_root: PathBuf,
}

impl<'a> PrecacheBuilder<'a> {
  /// Create a builder whose build root is interpreted relative to the working directory.
  pub fn new(config: &'a PrecacheConfig) -> Self {
    Self {
      config,
      build_root: PathBuf::from(&config.build_root),
    }
  }

  /// Resolve the configured build root against `base_dir`, typically the configuration
  /// file's directory.
  pub fn with_base_dir(mut self, base_dir: &Path) -> Self {
    self.build_root = self.config.build_root_path(base_dir);
    self
  }

  /// Build root the patterns are resolved against.
  pub fn build_root(&self) -> &Path {
    &self.build_root
  }

  /// Scan the configured patterns and serialise the resulting manifest.
  pub fn build(&self) -> ManifestResult<PrecacheArtifacts> {
    let _span = tracing::info_span!("precache", root = %self.build_root.display()).entered();

    let ManifestBuild { manifest, report } = build_manifest(
      &self.config.glob_patterns,
      &self.build_root,
      self.config.maximum_file_size_bytes,
    )?;
    let manifest_json = manifest.to_json()?;

    Ok(PrecacheArtifacts {
      manifest,
      manifest_json,
      report,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SizeBudget;
  use std::fs;
  use tempfile::tempdir;

  fn config(patterns: &[&str], budget: u64) -> PrecacheConfig {
    PrecacheConfig {
      build_root: "dist".into(),
      glob_patterns: patterns.iter().map(|pattern| pattern.to_string()).collect(),
      maximum_file_size_bytes: SizeBudget(budget),
    }
  }

  #[test]
  fn resolves_build_root_against_base_dir() {
    let temp = tempdir().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(dist.join("js")).unwrap();
    fs::write(dist.join("js/app.js"), b"app").unwrap();

    let config = config(&["js/*.js"], 1024);
    let builder = PrecacheBuilder::new(&config).with_base_dir(temp.path());
    assert_eq!(builder.build_root(), dist.as_path());

    let artifacts = builder.build().unwrap();
    assert_eq!(artifacts.manifest.len(), 1);
    assert_eq!(artifacts.manifest_json, artifacts.manifest.to_json().unwrap());
    assert_eq!(artifacts.report.total_accepted_bytes, 3);
  }

  #[test]
  fn detects_changes_against_previous_output() {
    let temp = tempdir().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(&dist).unwrap();
    fs::write(dist.join("index.html"), b"<html>v1</html>").unwrap();

    let config = config(&["*.html"], 1024);
    let builder = PrecacheBuilder::new(&config).with_base_dir(temp.path());
    let first = builder.build().unwrap();
    assert!(!first.differs_from(&format!("{}\n", first.manifest_json)));

    fs::write(dist.join("index.html"), b"<html>v2</html>").unwrap();
    let second = builder.build().unwrap();
    assert!(second.differs_from(&first.manifest_json));
  }
}
