//! Assemble the precache manifest from the configured patterns.

use std::collections::BTreeMap;
use std::path::Path;

use crate::asset_paths::GlobPattern;
use crate::config::SizeBudget;
use crate::errors::ManifestResult;
use crate::manifest::scanning::scan_compiled_pattern;
use crate::models::{Manifest, SizeOutcome, SizeReport};

/// Manifest together with the accept/skip decisions that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestBuild {
  /// Canonically ordered manifest.
  pub manifest: Manifest,
  /// Per-file decisions and the accepted size total.
  pub report: SizeReport,
}

impl ManifestBuild {
  /// Sum of the sizes of every accepted match.
  pub fn total_accepted_bytes(&self) -> u64 {
    self.report.total_accepted_bytes
  }
}

/// Scan every pattern below `root` and build the manifest.
///
/// Every pattern is validated before any file is read. Patterns are processed in order and a
/// path matched by more than one pattern keeps the hash from the last one. Files over the
/// budget are recorded as skipped. Any unreadable file fails the whole build.
pub fn build_manifest<P: AsRef<str>>(
  patterns: &[P],
  root: &Path,
  budget: SizeBudget,
) -> ManifestResult<ManifestBuild> {
  let compiled = patterns
    .iter()
    .map(|pattern| GlobPattern::compile(pattern.as_ref()))
    .collect::<ManifestResult<Vec<_>>>()?;

  let mut relative_path_to_hash: BTreeMap<String, String> = BTreeMap::new();
  let mut report = SizeReport::default();

  for pattern in &compiled {
    let records = scan_compiled_pattern(root, pattern)?;
    tracing::debug!(pattern = pattern.as_str(), matches = records.len(), "resolved pattern");

    for record in records {
      if budget.admits(record.size_bytes) {
        tracing::info!(path = %record.relative_path, size_bytes = record.size_bytes, "added");
        report.record(&record, SizeOutcome::Added);
        relative_path_to_hash.insert(record.relative_path, record.content_hash);
      } else {
        tracing::warn!(
          path = %record.relative_path,
          size_bytes = record.size_bytes,
          budget_bytes = budget.bytes(),
          "skipped, larger than the precache budget"
        );
        report.record(&record, SizeOutcome::Skipped);
      }
    }
  }

  tracing::info!(
    total_kib = report.total_accepted_kib(),
    entries = relative_path_to_hash.len(),
    "total precache size"
  );

  Ok(ManifestBuild {
    manifest: Manifest::from_map(relative_path_to_hash),
    report,
  })
}
