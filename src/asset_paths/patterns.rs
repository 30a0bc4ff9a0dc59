use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::errors::{ManifestError, ManifestResult};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: true,
};

/// A validated glob pattern resolved relative to the build root.
#[derive(Debug, Clone)]
pub struct GlobPattern {
  raw: String,
  matcher: Pattern,
  prefix: PathBuf,
  max_depth: Option<usize>,
}

impl GlobPattern {
  /// Validate and compile a pattern.
  ///
  /// `**` only recurses when it forms a whole segment; inside a segment (`css/**.css`) it
  /// matches like a single `*`. Absolute patterns and `..` segments are rejected because
  /// every match must stay below the build root.
  pub fn compile(raw: &str) -> ManifestResult<Self> {
    let invalid = |reason: String| ManifestError::InvalidPattern {
      pattern: raw.to_string(),
      reason,
    };

    let unified = raw.replace('\\', "/");
    if unified.starts_with('/') || Path::new(raw).is_absolute() {
      return Err(invalid("patterns must be relative to the build root".into()));
    }

    let segments: Vec<String> = unified
      .split('/')
      .filter(|segment| !segment.is_empty() && *segment != ".")
      .map(collapse_star_runs)
      .collect();

    if segments.iter().any(|segment| segment == "..") {
      return Err(invalid("patterns may not leave the build root".into()));
    }

    let normalised = segments.join("/");
    let matcher = Pattern::new(&normalised).map_err(|err| invalid(err.to_string()))?;

    let first_wildcard = segments.iter().position(|segment| has_wildcard(segment));
    let prefix_len = first_wildcard.unwrap_or(segments.len().saturating_sub(1));
    let prefix: PathBuf = segments[..prefix_len].iter().collect();
    let recursive = segments.iter().any(|segment| segment == "**");
    let max_depth = (!recursive).then(|| segments.len() - prefix_len);

    Ok(Self {
      raw: raw.to_string(),
      matcher,
      prefix,
      max_depth,
    })
  }

  /// Pattern text as supplied by configuration.
  pub fn as_str(&self) -> &str {
    &self.raw
  }

  /// Literal directory, relative to the root, that contains every possible match.
  pub fn prefix(&self) -> &Path {
    &self.prefix
  }

  /// Deepest level below [`Self::prefix`] a match can sit at, or `None` for recursive patterns.
  pub fn max_depth(&self) -> Option<usize> {
    self.max_depth
  }

  /// Test a forward-slash path relative to the build root.
  pub fn matches(&self, relative_path: &str) -> bool {
    self.matcher.matches_with(relative_path, MATCH_OPTIONS)
  }
}

fn has_wildcard(segment: &str) -> bool {
  segment.contains(['*', '?', '['])
}

fn collapse_star_runs(segment: &str) -> String {
  if segment == "**" {
    return segment.to_string();
  }

  let mut collapsed = String::with_capacity(segment.len());
  for ch in segment.chars() {
    if ch == '*' && collapsed.ends_with('*') {
      continue;
    }
    collapsed.push(ch);
  }
  collapsed
}
