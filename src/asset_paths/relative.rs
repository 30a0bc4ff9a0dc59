use std::path::{Component, Path};

use crate::errors::{ManifestError, ManifestResult};

/// Express `path` relative to `root` using forward slashes.
///
/// The generated path always uses `/` so that the manifest is identical on every platform,
/// regardless of the native directory separator used when the files were discovered.
/// Returns `Ok(None)` when `path` does not live below `root`. A segment that is not valid
/// UTF-8 has no exact manifest form and is an error.
pub fn relative_posix_path(root: &Path, path: &Path) -> ManifestResult<Option<String>> {
  let Ok(relative) = path.strip_prefix(root) else {
    return Ok(None);
  };

  let mut segments = Vec::new();
  for component in relative.components() {
    if let Component::Normal(segment) = component {
      let segment = segment.to_str().ok_or_else(|| ManifestError::NonUtf8Path {
        path: path.to_path_buf(),
      })?;
      segments.push(segment);
    }
  }

  if segments.is_empty() {
    Ok(None)
  } else {
    Ok(Some(segments.join("/")))
  }
}
