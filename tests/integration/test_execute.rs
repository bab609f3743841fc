//! Hook dispatch and dry-run execution through the plugin surface

use crate::helpers::{minimal_context, raw_config, release_context};
use gitlab_release_plugin::core::context::ReleaseContext;
use gitlab_release_plugin::core::credentials::StaticCredentials;
use gitlab_release_plugin::gitlab::DEFAULT_TIMEOUT;
use gitlab_release_plugin::hooks::Hook;
use gitlab_release_plugin::plugin::{ExecuteRequest, GitLabPlugin};
use serde_json::json;

fn plugin_without_env() -> GitLabPlugin {
  GitLabPlugin::with_credentials(StaticCredentials::empty(), DEFAULT_TIMEOUT)
}

#[tokio::test]
async fn post_publish_dry_run_with_explicit_project() {
  let request = ExecuteRequest {
    hook: Hook::PostPublish,
    config: raw_config(json!({ "token": "glpat-test", "project_id": "group/project" })),
    context: release_context(),
    dry_run: true,
  };

  let response = plugin_without_env().execute(&request).await;

  assert!(response.success, "error: {}", response.error);
  assert_eq!(response.message, "Would create GitLab release for group/project: v1.2.3");
  assert_eq!(response.outputs["tag_name"], "v1.2.3");
  assert_eq!(response.outputs["project_id"], "group/project");
  assert_eq!(response.outputs["name"], "Release 1.2.3");
}

#[tokio::test]
async fn post_publish_dry_run_infers_project_from_context() {
  let request = ExecuteRequest {
    hook: Hook::PostPublish,
    config: raw_config(json!({ "token": "glpat-test" })),
    context: release_context(),
    dry_run: true,
  };

  let response = plugin_without_env().execute(&request).await;

  assert!(response.success);
  assert_eq!(response.message, "Would create GitLab release for mygroup/myproject: v1.2.3");
  assert_eq!(response.outputs["project_id"], "mygroup/myproject");
}

#[tokio::test]
async fn post_publish_fails_without_token() {
  let request = ExecuteRequest {
    hook: Hook::PostPublish,
    config: raw_config(json!({ "project_id": "group/project" })),
    context: release_context(),
    dry_run: false,
  };

  let response = plugin_without_env().execute(&request).await;

  assert!(!response.success);
  assert!(response.error.contains("token is required"), "error: {}", response.error);
}

#[tokio::test]
async fn post_publish_dry_run_fails_without_any_project_source() {
  let request = ExecuteRequest {
    hook: Hook::PostPublish,
    config: raw_config(json!({ "token": "glpat-test" })),
    context: minimal_context("1.0.0", "v1.0.0"),
    dry_run: true,
  };

  let response = plugin_without_env().execute(&request).await;

  assert!(!response.success);
  assert!(response.error.contains("project_id is required"));
}

#[tokio::test]
async fn every_unhandled_hook_acknowledges_by_name() {
  let plugin = plugin_without_env();

  let unhandled = [
    Hook::PreInit,
    Hook::PostInit,
    Hook::PrePlan,
    Hook::PostPlan,
    Hook::PreVersion,
    Hook::PostVersion,
    Hook::PreNotes,
    Hook::PostNotes,
    Hook::PreApprove,
    Hook::PostApprove,
    Hook::PrePublish,
  ];

  for hook in unhandled {
    let request = ExecuteRequest {
      hook,
      config: raw_config(json!({})),
      context: ReleaseContext::default(),
      dry_run: false,
    };
    let response = plugin.execute(&request).await;
    assert!(response.success);
    assert_eq!(response.message, format!("Hook {} not handled", hook.as_str()));
  }
}

#[tokio::test]
async fn lifecycle_acknowledgment_hooks() {
  let plugin = plugin_without_env();

  let request = ExecuteRequest {
    hook: Hook::OnSuccess,
    config: raw_config(json!({})),
    context: release_context(),
    dry_run: false,
  };
  assert_eq!(plugin.execute(&request).await.message, "Release successful");

  let request = ExecuteRequest {
    hook: Hook::OnError,
    config: raw_config(json!({})),
    context: release_context(),
    dry_run: false,
  };
  assert_eq!(
    plugin.execute(&request).await.message,
    "Release failed notification acknowledged"
  );
}

#[tokio::test]
async fn complete_config_dry_run_resolves_everything_from_config() {
  let request = ExecuteRequest {
    hook: Hook::PostPublish,
    config: raw_config(json!({
      "token": "glpat-test",
      "project_id": "group/project",
      "base_url": "https://gitlab.example.com",
      "name": "Release v1.0.0 - Feature Release",
      "description": "This is a custom description",
      "ref": "main",
      "released_at": "2024-01-15T10:00:00Z",
      "milestones": ["v1.0.0", "Q4-2024"],
      "assets": ["dist/app.zip", "checksums.txt"],
      "asset_links": [
        {
          "name": "Linux Binary",
          "url": "https://cdn.example.com/app-linux",
          "filepath": "/binaries/linux",
          "link_type": "package",
        },
        {
          "name": "Documentation",
          "url": "https://docs.example.com",
          "link_type": "runbook",
        },
      ],
    })),
    context: release_context(),
    dry_run: true,
  };

  let response = plugin_without_env().execute(&request).await;

  assert!(response.success, "error: {}", response.error);
  assert_eq!(response.outputs["tag_name"], "v1.2.3");
  assert_eq!(response.outputs["project_id"], "group/project");
  assert_eq!(response.outputs["name"], "Release v1.0.0 - Feature Release");
  assert!(response.artifacts.is_empty());
}

#[tokio::test]
async fn malformed_config_fragments_do_not_break_execution() {
  // Normalization is total: junk entries drop out and the dry run proceeds
  let request = ExecuteRequest {
    hook: Hook::PostPublish,
    config: raw_config(json!({
      "token": "glpat-test",
      "project_id": "group/project",
      "milestones": ["valid", 123, null],
      "assets": "not-an-array",
      "asset_links": [
        "not a map",
        { "name": "Only Name" },
        { "name": "Valid", "url": "https://valid.example" },
      ],
    })),
    context: release_context(),
    dry_run: true,
  };

  let response = plugin_without_env().execute(&request).await;

  assert!(response.success, "error: {}", response.error);
  assert_eq!(response.message, "Would create GitLab release for group/project: v1.2.3");
}
