//! Asset path validation: working-directory confinement
//!
//! Asset paths come from configuration and are untrusted. Before any file is
//! opened for upload, the path must resolve to a regular file inside the
//! working directory. The check runs twice: once lexically (so `..` segments
//! are rejected without touching the filesystem) and once against the
//! canonicalized real path (so a symlink cannot point the upload outside the
//! tree). Checks compare resolved real paths, not literal strings.

use crate::core::error::PathError;
use std::path::{Component, Path, PathBuf};

/// Validate an asset path against the process working directory
///
/// Returns the fully canonicalized absolute path on success.
pub fn validate_asset_path(path: &str) -> Result<PathBuf, PathError> {
  let cwd = std::env::current_dir().map_err(|e| PathError::NotAccessible {
    path: path.to_string(),
    detail: format!("cannot determine working directory: {}", e),
  })?;
  validate_asset_path_in(&cwd, path)
}

/// Validate an asset path against an explicit base directory
///
/// `base` must be an absolute path. Relative asset paths resolve against it;
/// absolute asset paths are accepted only when they stay inside it.
pub fn validate_asset_path_in(base: &Path, path: &str) -> Result<PathBuf, PathError> {
  if path.is_empty() {
    return Err(PathError::Empty);
  }

  let candidate = Path::new(path);
  let joined = if candidate.is_absolute() {
    candidate.to_path_buf()
  } else {
    base.join(candidate)
  };

  // Lexical pass: fold away `.` and `..` without filesystem access, then
  // require containment. Catches traversal even for paths that do not exist.
  let lexical = normalize_lexically(&joined);
  let base_lexical = normalize_lexically(base);
  if !lexical.starts_with(&base_lexical) {
    return Err(PathError::Traversal {
      path: path.to_string(),
    });
  }

  // Real pass: canonicalize both sides and re-check containment so a symlink
  // inside the tree cannot resolve outside it.
  let real_base = std::fs::canonicalize(base).map_err(|e| PathError::NotAccessible {
    path: path.to_string(),
    detail: format!("cannot resolve working directory: {}", e),
  })?;
  let real = std::fs::canonicalize(&lexical).map_err(|e| PathError::NotAccessible {
    path: path.to_string(),
    detail: e.to_string(),
  })?;
  if !real.starts_with(&real_base) {
    return Err(PathError::Traversal {
      path: path.to_string(),
    });
  }

  if real.is_dir() {
    return Err(PathError::IsDirectory {
      path: path.to_string(),
    });
  }

  Ok(real)
}

/// Fold `.` and `..` components without touching the filesystem
///
/// `..` at the root stays at the root, matching how the OS resolves it.
fn normalize_lexically(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::Prefix(p) => out.push(p.as_os_str()),
      Component::RootDir => out.push(Component::RootDir.as_os_str()),
      Component::CurDir => {}
      Component::ParentDir => {
        out.pop();
      }
      Component::Normal(c) => out.push(c),
    }
  }
  out
}
