//! Release composition and publishing orchestration
//!
//! # Core Invariants
//!
//! 1. **Token and project are preconditions of intent, not of the network**
//!    - Both are checked before any I/O, dry-run included
//!    - Failures are structured results with caller-matchable messages
//!
//! 2. **Release creation is fatal, asset uploads are not**
//!    - A failed create aborts the operation
//!    - A failed upload (path rejection or API error) skips that one asset;
//!      the release result stays successful and lists only uploaded artifacts
//!
//! 3. **Assets upload sequentially, in configured order**
//!    - Failure attribution stays unambiguous without any coordination
//!
//! # Flow
//!
//! ```text
//! create_release:
//!   resolve project/token/name/description/ref
//!   dry-run? -> report what would happen, no I/O
//!   POST release (milestones + asset links inline)
//!   for each asset: validate path -> upload -> record artifact
//! ```

pub mod compose;

use crate::core::config::Config;
use crate::core::context::ReleaseContext;
use crate::core::credentials::{CredentialSource, TOKEN_ENV_FALLBACK, TOKEN_ENV_PRIMARY, resolve_token};
use crate::core::error::{PluginError, PluginResult};
use crate::core::security::validate_asset_path;
use crate::gitlab::GitLabClient;
use crate::gitlab::types::CreateReleaseRequest;
use crate::plugin::{Artifact, ExecuteResponse};
use serde_json::Value;
use std::time::Duration;

/// Artifact type marker for generic package uploads
pub const ARTIFACT_TYPE_GENERIC_PACKAGE: &str = "generic_package";

/// Compose and (unless dry-run) publish a GitLab release
///
/// Never returns an error: every failure becomes a structured response with
/// `success = false` so the host can treat it as an ordinary negative outcome.
pub async fn create_release(
  config: &Config,
  ctx: &ReleaseContext,
  dry_run: bool,
  creds: &dyn CredentialSource,
  timeout: Duration,
) -> ExecuteResponse {
  let project_id = match compose::resolve_project_id(config, ctx) {
    Ok(id) => id,
    Err(e) => return ExecuteResponse::failure(e.to_string()),
  };

  // Token possession is required even for a dry run
  let Some(token) = resolve_token(&config.token, creds) else {
    return ExecuteResponse::failure(format!(
      "GitLab token is required: set token in config or the {} / {} environment variable",
      TOKEN_ENV_PRIMARY, TOKEN_ENV_FALLBACK
    ));
  };

  let name = compose::resolve_release_name(config, ctx);
  let description = compose::resolve_description(config, ctx);
  let ref_name = compose::resolve_ref(config, ctx);

  if dry_run {
    let mut response = ExecuteResponse::success(format!(
      "Would create GitLab release for {}: {}",
      project_id, ctx.tag_name
    ));
    response.insert_output("tag_name", Value::String(ctx.tag_name.clone()));
    response.insert_output("project_id", Value::String(project_id));
    response.insert_output("name", Value::String(name));
    return response;
  }

  let client = match GitLabClient::new(&config.base_url, &token, timeout) {
    Ok(client) => client,
    Err(e) => return ExecuteResponse::failure(format!("failed to create release: {}", e)),
  };

  let request = CreateReleaseRequest {
    name: name.clone(),
    tag_name: ctx.tag_name.clone(),
    ref_name,
    description: (!description.is_empty()).then_some(description),
    released_at: compose::resolve_released_at(config),
    milestones: (!config.milestones.is_empty()).then(|| config.milestones.clone()),
    assets: compose::resolve_asset_links(config),
  };

  if let Err(e) = client.create_release(&project_id, &request).await {
    return ExecuteResponse::failure(format!("failed to create release: {}", e));
  }

  // Sequential fold over assets; each failure is recorded and skipped
  let mut artifacts = Vec::new();
  for asset in &config.assets {
    match upload_asset(&client, &project_id, &ctx.tag_name, asset).await {
      Ok(artifact) => artifacts.push(artifact),
      Err(e) => eprintln!("⚠️  Skipping asset {}: {}", asset, e),
    }
  }

  let url = compose::release_url(&config.base_url, &project_id, &ctx.tag_name);
  let mut response = ExecuteResponse::success(format!("Created GitLab release: {}", url));
  response.insert_output("release_url", Value::String(url));
  response.insert_output("tag_name", Value::String(ctx.tag_name.clone()));
  response.insert_output("project_id", Value::String(project_id));
  response.insert_output("name", Value::String(name));
  response.artifacts = artifacts;
  response
}

/// Validate one asset path and upload it as a generic package
pub async fn upload_asset(
  client: &GitLabClient,
  project_id: &str,
  tag_name: &str,
  asset_path: &str,
) -> PluginResult<Artifact> {
  let resolved = validate_asset_path(asset_path)?;

  let file_name = resolved
    .file_name()
    .and_then(|n| n.to_str())
    .ok_or_else(|| PluginError::message(format!("asset path has no file name: {}", asset_path)))?;

  let size = client
    .upload_generic_package(project_id, tag_name, file_name, &resolved)
    .await?;

  Ok(Artifact {
    name: file_name.to_string(),
    artifact_type: ARTIFACT_TYPE_GENERIC_PACKAGE.to_string(),
    size,
  })
}
