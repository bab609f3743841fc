//! Inbound plugin interface: info, validate, execute
//!
//! The host orchestrator speaks three calls: `info` (capability discovery and
//! config schema), `validate` (raw-config diagnostics before any execution),
//! and `execute` (hook dispatch). Each call is independent; the plugin holds
//! no state between invocations beyond its injected credential source.

use crate::core::config::{Config, LinkType};
use crate::core::context::ReleaseContext;
use crate::core::credentials::{CredentialSource, EnvCredentials};
use crate::core::validate::{ValidationReport, validate};
use crate::gitlab::DEFAULT_TIMEOUT;
use crate::hooks::Hook;
use crate::release;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::time::Duration;

/// Plugin identity and capability description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
  pub name: String,
  pub version: String,
  pub description: String,
  pub author: String,
  pub hooks: Vec<Hook>,
  pub config_schema: Value,
}

/// One hook invocation from the host
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteRequest {
  pub hook: Hook,

  #[serde(default)]
  pub config: Map<String, Value>,

  #[serde(default)]
  pub context: ReleaseContext,

  #[serde(default)]
  pub dry_run: bool,
}

/// Structured outcome of a hook invocation
///
/// Failures are data, not faults: `success = false` plus a message/error pair
/// the host can match on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteResponse {
  pub success: bool,

  pub message: String,

  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub error: String,

  #[serde(default, skip_serializing_if = "Map::is_empty")]
  pub outputs: Map<String, Value>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub artifacts: Vec<Artifact>,
}

impl ExecuteResponse {
  /// Successful outcome with a message
  pub fn success(message: impl Into<String>) -> Self {
    ExecuteResponse {
      success: true,
      message: message.into(),
      ..ExecuteResponse::default()
    }
  }

  /// Failed outcome; the detail lands in both message and error
  pub fn failure(detail: impl Into<String>) -> Self {
    let detail = detail.into();
    ExecuteResponse {
      success: false,
      message: detail.clone(),
      error: detail,
      ..ExecuteResponse::default()
    }
  }

  /// Record a named output value
  pub fn insert_output(&mut self, key: &str, value: Value) {
    self.outputs.insert(key.to_string(), value);
  }
}

/// An uploaded release artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
  pub name: String,

  #[serde(rename = "type")]
  pub artifact_type: String,

  pub size: i64,
}

/// The GitLab release plugin
///
/// Carries the credential source and the per-request timeout; everything else
/// is derived fresh per call.
pub struct GitLabPlugin {
  creds: Box<dyn CredentialSource + Send + Sync>,
  timeout: Duration,
}

impl Default for GitLabPlugin {
  fn default() -> Self {
    Self::new()
  }
}

impl GitLabPlugin {
  /// Plugin reading tokens from the process environment
  pub fn new() -> Self {
    Self {
      creds: Box::new(EnvCredentials),
      timeout: DEFAULT_TIMEOUT,
    }
  }

  /// Plugin with an explicit credential source and timeout (tests, embedding)
  pub fn with_credentials(creds: impl CredentialSource + Send + Sync + 'static, timeout: Duration) -> Self {
    Self {
      creds: Box::new(creds),
      timeout,
    }
  }

  /// Identity, handled hooks, and the self-describing config schema
  pub fn info(&self) -> PluginInfo {
    PluginInfo {
      name: "gitlab".to_string(),
      version: env!("CARGO_PKG_VERSION").to_string(),
      description: "Create GitLab releases and upload assets".to_string(),
      author: env!("CARGO_PKG_AUTHORS").to_string(),
      hooks: vec![Hook::PostPublish, Hook::OnSuccess, Hook::OnError],
      config_schema: config_schema(),
    }
  }

  /// Validate a raw configuration map
  pub fn validate(&self, raw: &Map<String, Value>) -> ValidationReport {
    validate(raw, self.creds.as_ref())
  }

  /// Dispatch a hook invocation
  pub async fn execute(&self, request: &ExecuteRequest) -> ExecuteResponse {
    match request.hook {
      Hook::PostPublish => {
        let config = Config::parse(&request.config);
        release::create_release(
          &config,
          &request.context,
          request.dry_run,
          self.creds.as_ref(),
          self.timeout,
        )
        .await
      }
      Hook::OnSuccess => ExecuteResponse::success("Release successful"),
      Hook::OnError => ExecuteResponse::success("Release failed notification acknowledged"),
      other => ExecuteResponse::success(format!("Hook {} not handled", other)),
    }
  }
}

/// Schema document enumerating every recognized config field
fn config_schema() -> Value {
  json!({
    "type": "object",
    "properties": {
      "base_url": {
        "type": "string",
        "description": "GitLab instance URL (default: https://gitlab.com)"
      },
      "project_id": {
        "type": "string",
        "description": "Project path (group/project) or numeric ID; inferred from the release context when omitted"
      },
      "token": {
        "type": "string",
        "description": "API token; falls back to GITLAB_TOKEN, then GL_TOKEN"
      },
      "name": {
        "type": "string",
        "description": "Release name (default: Release {version})"
      },
      "description": {
        "type": "string",
        "description": "Release description (default: release notes, then changelog)"
      },
      "ref": {
        "type": "string",
        "description": "Git ref to tag from (default: the tag name)"
      },
      "released_at": {
        "type": "string",
        "description": "Release timestamp, RFC 3339"
      },
      "milestones": {
        "type": "array",
        "items": { "type": "string" },
        "description": "Milestone titles to associate with the release"
      },
      "assets": {
        "type": "array",
        "items": { "type": "string" },
        "description": "Local file paths to upload as generic packages"
      },
      "asset_links": {
        "type": "array",
        "description": "External links to attach to the release",
        "items": {
          "type": "object",
          "required": ["name", "url"],
          "properties": {
            "name": { "type": "string" },
            "url": { "type": "string" },
            "filepath": { "type": "string" },
            "link_type": { "type": "string", "enum": LinkType::VALUES }
          }
        }
      }
    }
  })
}
