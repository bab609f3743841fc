//! Test helpers for integration tests

use anyhow::Result;
use gitlab_release_plugin::core::context::ReleaseContext;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use tempfile::TempDir;

/// Serialize tests that change the process working directory
///
/// The asset upload path resolves against the current working directory,
/// which is process-global state; tests that chdir must hold this lock.
fn cwd_lock() -> MutexGuard<'static, ()> {
  static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
  LOCK
    .get_or_init(|| Mutex::new(()))
    .lock()
    .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Working-directory change that restores the original directory on drop
pub struct CwdGuard {
  original: PathBuf,
  _lock: MutexGuard<'static, ()>,
}

impl Drop for CwdGuard {
  fn drop(&mut self) {
    let _ = std::env::set_current_dir(&self.original);
  }
}

/// Enter a directory for the duration of the returned guard
pub fn enter_dir(path: &Path) -> Result<CwdGuard> {
  let lock = cwd_lock();
  let original = std::env::current_dir()?;
  std::env::set_current_dir(path)?;
  Ok(CwdGuard {
    original,
    _lock: lock,
  })
}

/// A temp workspace holding asset files, used as the working directory
pub struct AssetWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl AssetWorkspace {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().canonicalize()?;
    Ok(Self { _root: root, path })
  }

  /// Write an asset file
  pub fn add_asset(&self, name: &str, content: &[u8]) -> Result<()> {
    std::fs::write(self.path.join(name), content)?;
    Ok(())
  }
}

/// Raw config map from inline JSON
pub fn raw_config(value: Value) -> Map<String, Value> {
  value.as_object().expect("test config must be an object").clone()
}

/// A fully populated release context
pub fn release_context() -> ReleaseContext {
  ReleaseContext {
    version: "1.2.3".to_string(),
    previous_version: "1.2.2".to_string(),
    tag_name: "v1.2.3".to_string(),
    release_type: "patch".to_string(),
    repository_owner: "mygroup".to_string(),
    repository_name: "myproject".to_string(),
    branch: "main".to_string(),
    commit_sha: "abc123def456".to_string(),
    changelog: "## Changes\n- Fixed bug".to_string(),
    release_notes: "This release fixes a critical bug.".to_string(),
  }
}

/// A minimal context carrying only version and tag
pub fn minimal_context(version: &str, tag: &str) -> ReleaseContext {
  ReleaseContext {
    version: version.to_string(),
    tag_name: tag.to_string(),
    ..ReleaseContext::default()
  }
}
