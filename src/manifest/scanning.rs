//! Resolve glob patterns against the build root and fingerprint the matched files.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::asset_paths::{GlobPattern, relative_posix_path};
use crate::errors::{ManifestError, ManifestResult};
use crate::models::FileRecord;

/// Resolve a single pattern and return a record for every regular file it matches.
///
/// Records are sorted by relative path, independent of the order the filesystem lists
/// directory entries in. A pattern that matches nothing yields an empty list.
pub fn scan_pattern(root: &Path, pattern: &str) -> ManifestResult<Vec<FileRecord>> {
  let pattern = GlobPattern::compile(pattern)?;
  scan_compiled_pattern(root, &pattern)
}

pub(crate) fn scan_compiled_pattern(
  root: &Path,
  pattern: &GlobPattern,
) -> ManifestResult<Vec<FileRecord>> {
  let matches = resolve_matches(root, pattern)?;

  matches
    .into_par_iter()
    .map(|(relative_path, source_path)| read_file_record(relative_path, source_path))
    .collect()
}

/// Lowercase hex MD5 digest used as the change-detection fingerprint.
pub fn content_hash(bytes: &[u8]) -> String {
  format!("{:x}", md5::compute(bytes))
}

fn resolve_matches(root: &Path, pattern: &GlobPattern) -> ManifestResult<Vec<(String, PathBuf)>> {
  let start = if pattern.prefix().as_os_str().is_empty() {
    root.to_path_buf()
  } else {
    root.join(pattern.prefix())
  };
  if !start.is_dir() {
    return Ok(Vec::new());
  }

  let mut walker = WalkDir::new(&start)
    .follow_links(false)
    .sort_by_file_name()
    .min_depth(1);
  if let Some(depth) = pattern.max_depth() {
    walker = walker.max_depth(depth);
  }

  let mut matches = Vec::new();
  for entry in walker {
    let entry = entry.map_err(|source| ManifestError::Walk {
      pattern: pattern.as_str().to_string(),
      path: source.path().map_or_else(|| start.clone(), Path::to_path_buf),
      source,
    })?;

    let file_type = entry.file_type();
    if file_type.is_dir() {
      continue;
    }

    let Some(relative_path) = relative_posix_path(root, entry.path())? else {
      continue;
    };
    if !pattern.matches(&relative_path) {
      continue;
    }

    if file_type.is_symlink() {
      let metadata = fs::metadata(entry.path()).map_err(|source| ManifestError::FileRead {
        path: entry.path().to_path_buf(),
        source,
      })?;
      if !metadata.is_file() {
        continue;
      }
    } else if !file_type.is_file() {
      continue;
    }

    matches.push((relative_path, entry.into_path()));
  }

  matches.sort_by(|left, right| left.0.cmp(&right.0));
  Ok(matches)
}

fn read_file_record(relative_path: String, source_path: PathBuf) -> ManifestResult<FileRecord> {
  let contents = fs::read(&source_path).map_err(|source| ManifestError::FileRead {
    path: source_path.clone(),
    source,
  })?;

  Ok(FileRecord {
    relative_path,
    size_bytes: contents.len() as u64,
    content_hash: content_hash(&contents),
    source_path,
  })
}
