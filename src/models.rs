//! Data structures produced while generating a precache manifest.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize, Serializer};

use crate::errors::ManifestResult;

/// A matched file with its size and content fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
  /// Forward-slash path relative to the build root.
  pub relative_path: String,
  /// Location the record was read from.
  pub source_path: PathBuf,
  /// Size of the file contents in bytes.
  pub size_bytes: u64,
  /// Lowercase hex MD5 digest of the file contents.
  pub content_hash: String,
}

/// Single manifest row, serialised as a `[path, hash]` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct ManifestEntry {
  /// Forward-slash path relative to the build root.
  pub relative_path: String,
  /// Lowercase hex digest of the file contents.
  pub content_hash: String,
}

impl From<(String, String)> for ManifestEntry {
  fn from((relative_path, content_hash): (String, String)) -> Self {
    Self {
      relative_path,
      content_hash,
    }
  }
}

impl From<ManifestEntry> for (String, String) {
  fn from(entry: ManifestEntry) -> Self {
    (entry.relative_path, entry.content_hash)
  }
}

/// Canonically ordered precache manifest.
///
/// Entries are strictly ascending by relative path, so two manifests built from the same
/// tree always serialise to the same bytes. The serialised form is an array of pairs rather
/// than an object because object key order is not something every consumer preserves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<ManifestEntry>")]
pub struct Manifest {
  entries: Vec<ManifestEntry>,
}

impl Manifest {
  /// Build a manifest from an accumulated path to hash mapping.
  pub fn from_map(map: BTreeMap<String, String>) -> Self {
    let entries = map.into_iter().map(ManifestEntry::from).collect();
    Self { entries }
  }

  /// Entries in canonical order.
  pub fn entries(&self) -> &[ManifestEntry] {
    &self.entries
  }

  /// Number of cached paths.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when nothing is cached.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Look up the content hash recorded for a relative path.
  pub fn hash_for(&self, relative_path: &str) -> Option<&str> {
    self
      .entries
      .binary_search_by(|entry| entry.relative_path.as_str().cmp(relative_path))
      .ok()
      .map(|index| self.entries[index].content_hash.as_str())
  }

  /// Serialise into the compact literal handed to the template renderer.
  pub fn to_json(&self) -> ManifestResult<String> {
    Ok(serde_json::to_string(self)?)
  }

  /// Parse a previously emitted manifest literal.
  pub fn from_json(value: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(value)
  }
}

impl Serialize for Manifest {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(&self.entries)
  }
}

impl TryFrom<Vec<ManifestEntry>> for Manifest {
  type Error = String;

  fn try_from(entries: Vec<ManifestEntry>) -> Result<Self, Self::Error> {
    if let Some(pair) = entries
      .windows(2)
      .find(|pair| pair[0].relative_path >= pair[1].relative_path)
    {
      return Err(format!(
        "manifest entries must be strictly ascending by path, found '{}' before '{}'",
        pair[0].relative_path, pair[1].relative_path
      ));
    }
    Ok(Self { entries })
  }
}

/// Whether a matched file made it into the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeOutcome {
  /// Within budget and cached.
  Added,
  /// Larger than the budget and left out.
  Skipped,
}

/// Budget decision taken for one matched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeDecision {
  /// Forward-slash path relative to the build root.
  pub relative_path: String,
  /// Size of the file in bytes.
  pub size_bytes: u64,
  /// Whether the file was cached.
  pub outcome: SizeOutcome,
}

/// Per-file accept/skip log plus the cumulative accepted size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeReport {
  /// Decisions in processing order.
  pub decisions: Vec<SizeDecision>,
  /// Sum of the sizes of every accepted match.
  pub total_accepted_bytes: u64,
}

impl SizeReport {
  pub(crate) fn record(&mut self, record: &FileRecord, outcome: SizeOutcome) {
    if outcome == SizeOutcome::Added {
      self.total_accepted_bytes += record.size_bytes;
    }
    self.decisions.push(SizeDecision {
      relative_path: record.relative_path.clone(),
      size_bytes: record.size_bytes,
      outcome,
    });
  }

  /// Decisions that added a file to the manifest.
  pub fn accepted(&self) -> impl Iterator<Item = &SizeDecision> {
    self
      .decisions
      .iter()
      .filter(|decision| decision.outcome == SizeOutcome::Added)
  }

  /// Decisions that left a file out for exceeding the budget.
  pub fn skipped(&self) -> impl Iterator<Item = &SizeDecision> {
    self
      .decisions
      .iter()
      .filter(|decision| decision.outcome == SizeOutcome::Skipped)
  }

  /// Accepted total in KiB, rounded half up for display.
  pub fn total_accepted_kib(&self) -> u64 {
    (self.total_accepted_bytes + 512) / 1024
  }
}

impl fmt::Display for SizeDecision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self.outcome {
      SizeOutcome::Added => "Added",
      SizeOutcome::Skipped => "Skipped",
    };
    write!(f, "  {} {} - {} bytes", label, self.relative_path, self.size_bytes)
  }
}

impl fmt::Display for SizeReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for decision in &self.decisions {
      writeln!(f, "{decision}")?;
    }
    write!(f, "Total precache size: {} KB", self.total_accepted_kib())
  }
}
