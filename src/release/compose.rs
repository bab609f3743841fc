//! Resolution of release fields from config and context
//!
//! Each resolver is a pure function over the normalized config and the release
//! context. Config always wins; context supplies the fallback; the precedence
//! chains here are part of the host contract.

use crate::core::config::{Config, LinkType};
use crate::core::context::ReleaseContext;
use crate::core::error::PluginError;
use crate::gitlab::normalize_base_url;
use crate::gitlab::types::{ReleaseAssets, ReleaseLinkRequest};
use chrono::{DateTime, Utc};

/// Resolve the target project: explicit config, else owner/name from context
pub fn resolve_project_id(config: &Config, ctx: &ReleaseContext) -> Result<String, PluginError> {
  if !config.project_id.is_empty() {
    return Ok(config.project_id.clone());
  }
  if !ctx.repository_owner.is_empty() && !ctx.repository_name.is_empty() {
    return Ok(format!("{}/{}", ctx.repository_owner, ctx.repository_name));
  }
  Err(PluginError::with_help(
    "project_id is required: set project_id in config or provide repository owner/name in the release context",
    "Set project_id = \"group/project\" in the plugin config.",
  ))
}

/// Resolve the release name: explicit config, else "Release {version}"
pub fn resolve_release_name(config: &Config, ctx: &ReleaseContext) -> String {
  if !config.name.is_empty() {
    config.name.clone()
  } else {
    format!("Release {}", ctx.version)
  }
}

/// Resolve the description: config, then release notes, then changelog
pub fn resolve_description(config: &Config, ctx: &ReleaseContext) -> String {
  if !config.description.is_empty() {
    config.description.clone()
  } else if !ctx.release_notes.is_empty() {
    ctx.release_notes.clone()
  } else {
    ctx.changelog.clone()
  }
}

/// Resolve the ref to tag from: explicit config, else the tag itself
pub fn resolve_ref(config: &Config, ctx: &ReleaseContext) -> String {
  if !config.ref_name.is_empty() {
    config.ref_name.clone()
  } else {
    ctx.tag_name.clone()
  }
}

/// Browsable release page URL
pub fn release_url(base_url: &str, project_id: &str, tag_name: &str) -> String {
  format!("{}/{}/-/releases/{}", normalize_base_url(base_url), project_id, tag_name)
}

/// Parse released_at as RFC 3339; unparseable values are dropped with a warning
pub fn resolve_released_at(config: &Config) -> Option<DateTime<Utc>> {
  if config.released_at.is_empty() {
    return None;
  }
  match DateTime::parse_from_rfc3339(&config.released_at) {
    Ok(parsed) => Some(parsed.with_timezone(&Utc)),
    Err(e) => {
      eprintln!("⚠️  Ignoring unparseable released_at {:?}: {}", config.released_at, e);
      None
    }
  }
}

/// Map configured asset links to the API link shape
///
/// Link types outside the closed set map to "unspecified" rather than failing:
/// by the time we are composing, validation has had its say.
pub fn resolve_asset_links(config: &Config) -> Option<ReleaseAssets> {
  if config.asset_links.is_empty() {
    return None;
  }
  let links = config
    .asset_links
    .iter()
    .map(|link| ReleaseLinkRequest {
      name: link.name.clone(),
      url: link.url.clone(),
      filepath: (!link.filepath.is_empty()).then(|| link.filepath.clone()),
      link_type: LinkType::parse(&link.link_type),
    })
    .collect();
  Some(ReleaseAssets { links })
}
