//! Release context supplied by the host orchestrator
//!
//! Read-only input describing the release being published. The plugin performs
//! no validation on these fields; they are trusted orchestrator output.

use serde::{Deserialize, Serialize};

/// Release context for a single hook invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseContext {
  /// Version being released (e.g. "1.2.3")
  pub version: String,

  /// Previously released version, if any
  pub previous_version: String,

  /// Git tag for this release (e.g. "v1.2.3")
  pub tag_name: String,

  /// Release type label (major, minor, patch, ...)
  pub release_type: String,

  /// Repository owner (group or namespace)
  pub repository_owner: String,

  /// Repository name
  pub repository_name: String,

  /// Branch the release was cut from
  pub branch: String,

  /// Commit identifier the release points at
  pub commit_sha: String,

  /// Generated changelog text
  pub changelog: String,

  /// Curated release notes text
  pub release_notes: String,
}
