//! Plugin configuration: normalization from untyped key/value maps
//!
//! The host hands the plugin an arbitrary JSON/TOML-sourced map. `Config::parse`
//! turns that map into a strict record and never fails: individually malformed
//! fields and array elements are dropped, not repaired. Reporting input defects
//! is the validator's job (`core::validate`), which runs over the same raw map
//! independently. The two passes have different error-tolerance policies and
//! must stay separate.

use crate::core::error::{ConfigError, PluginError, PluginResult, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Default public GitLab endpoint, used when `base_url` is not configured
pub const DEFAULT_BASE_URL: &str = "https://gitlab.com";

/// Normalized plugin configuration, built once per invocation
///
/// Empty strings mean "not configured"; defaults are derived at composition
/// time from the release context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// GitLab instance base URL (default: <https://gitlab.com>)
  pub base_url: String,

  /// Project path ("group/project") or numeric ID; inferred from the
  /// release context when empty
  pub project_id: String,

  /// API token; may instead come from GITLAB_TOKEN / GL_TOKEN
  pub token: String,

  /// Release name (default: "Release {version}")
  pub name: String,

  /// Release description (default: release notes, then changelog)
  pub description: String,

  /// Git ref to tag from (default: the tag name itself)
  #[serde(rename = "ref")]
  pub ref_name: String,

  /// Release timestamp, RFC 3339
  pub released_at: String,

  /// Milestone titles to associate with the release
  pub milestones: Vec<String>,

  /// Local file paths to upload as generic packages
  pub assets: Vec<String>,

  /// External links to attach to the release
  pub asset_links: Vec<AssetLink>,
}

/// An external link attached to a release
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetLink {
  /// Display name (required)
  pub name: String,

  /// Target URL (required)
  pub url: String,

  /// Virtual mount path on the GitLab side (optional)
  pub filepath: String,

  /// Link kind: one of other, runbook, image, package (optional)
  pub link_type: String,
}

/// Closed set of GitLab release link kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
  Other,
  Runbook,
  Image,
  Package,
}

impl LinkType {
  /// All accepted wire values, in schema order
  pub const VALUES: [&'static str; 4] = ["other", "runbook", "image", "package"];

  /// Parse a config string; `None` for anything outside the closed set
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "other" => Some(LinkType::Other),
      "runbook" => Some(LinkType::Runbook),
      "image" => Some(LinkType::Image),
      "package" => Some(LinkType::Package),
      _ => None,
    }
  }

  /// Wire representation
  pub fn as_str(self) -> &'static str {
    match self {
      LinkType::Other => "other",
      LinkType::Runbook => "runbook",
      LinkType::Image => "image",
      LinkType::Package => "package",
    }
  }
}

impl Config {
  /// Normalize a raw key/value map into a strict configuration
  ///
  /// Total: never fails. Type mismatches read as absent fields; non-string
  /// array elements are skipped; asset_links entries missing `name` or `url`
  /// are dropped whole. Output array order matches the order of well-formed
  /// input elements.
  pub fn parse(raw: &Map<String, Value>) -> Self {
    let mut config = Config {
      base_url: string_field(raw, "base_url"),
      project_id: string_field(raw, "project_id"),
      token: string_field(raw, "token"),
      name: string_field(raw, "name"),
      description: string_field(raw, "description"),
      ref_name: string_field(raw, "ref"),
      released_at: string_field(raw, "released_at"),
      ..Config::default()
    };

    if let Some(Value::Array(items)) = raw.get("milestones") {
      config.milestones = items.iter().filter_map(|v| v.as_str().map(String::from)).collect();
    }

    if let Some(Value::Array(items)) = raw.get("assets") {
      config.assets = items.iter().filter_map(|v| v.as_str().map(String::from)).collect();
    }

    if let Some(Value::Array(items)) = raw.get("asset_links") {
      config.asset_links = items.iter().filter_map(parse_asset_link).collect();
    }

    config
  }
}

/// Read a string entry; wrong-typed or missing entries read as empty
fn string_field(raw: &Map<String, Value>, key: &str) -> String {
  match raw.get(key) {
    Some(Value::String(s)) => s.clone(),
    _ => String::new(),
  }
}

/// Interpret one asset_links element; `None` drops it entirely
fn parse_asset_link(value: &Value) -> Option<AssetLink> {
  let entry = value.as_object()?;

  let name = entry.get("name")?.as_str()?;
  let url = entry.get("url")?.as_str()?;
  if name.is_empty() || url.is_empty() {
    return None;
  }

  let opt = |key: &str| {
    entry
      .get(key)
      .and_then(Value::as_str)
      .map(String::from)
      .unwrap_or_default()
  };

  Some(AssetLink {
    name: name.to_string(),
    url: url.to_string(),
    filepath: opt("filepath"),
    link_type: opt("link_type"),
  })
}

/// Load a raw config map from a TOML or JSON file
///
/// The format is picked by extension (`.toml` vs anything else = JSON).
/// Returns the untyped map so normalization and validation each see the
/// original document.
pub fn load_raw_config(path: &Path) -> PluginResult<Map<String, Value>> {
  if !path.exists() {
    return Err(PluginError::Config(ConfigError::NotFound {
      path: path.to_path_buf(),
    }));
  }

  let content =
    fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;

  let value: Value = if path.extension().is_some_and(|ext| ext == "toml") {
    toml_edit::de::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))?
  } else {
    serde_json::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))?
  };

  into_raw_map(value)
}

/// Parse a raw config map from a JSON string (stdin path)
pub fn raw_config_from_json(content: &str) -> PluginResult<Map<String, Value>> {
  let value: Value = serde_json::from_str(content)?;
  into_raw_map(value)
}

fn into_raw_map(value: Value) -> PluginResult<Map<String, Value>> {
  match value {
    Value::Object(map) => Ok(map),
    _ => Err(PluginError::Config(ConfigError::NotAMap)),
  }
}
