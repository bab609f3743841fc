//! Live execution paths against a mock GitLab API

use crate::helpers::{AssetWorkspace, enter_dir, minimal_context, raw_config};
use anyhow::Result;
use gitlab_release_plugin::core::credentials::StaticCredentials;
use gitlab_release_plugin::gitlab::{DEFAULT_TIMEOUT, GitLabClient};
use gitlab_release_plugin::hooks::Hook;
use gitlab_release_plugin::plugin::{ExecuteRequest, GitLabPlugin};
use gitlab_release_plugin::release;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn plugin_without_env() -> GitLabPlugin {
  GitLabPlugin::with_credentials(StaticCredentials::empty(), DEFAULT_TIMEOUT)
}

async fn mock_release_endpoint(server: &MockServer) {
  Mock::given(method("POST"))
    .and(path_regex(r"^/api/v4/projects/.+/releases$"))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!({
      "tag_name": "v1.0.0",
      "name": "Release 1.0.0",
    })))
    .mount(server)
    .await;
}

async fn mock_package_endpoint(server: &MockServer) {
  Mock::given(method("PUT"))
    .and(path_regex(r"^/api/v4/projects/.+/packages/generic/.+$"))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "201 Created" })))
    .mount(server)
    .await;
}

fn execute_request(server: &MockServer, extra: serde_json::Value) -> ExecuteRequest {
  let mut config = raw_config(json!({
    "token": "glpat-test",
    "project_id": "group/project",
    "base_url": server.uri(),
  }));
  for (key, value) in extra.as_object().expect("extra must be an object") {
    config.insert(key.clone(), value.clone());
  }
  ExecuteRequest {
    hook: Hook::PostPublish,
    config,
    context: minimal_context("1.0.0", "v1.0.0"),
    dry_run: false,
  }
}

#[tokio::test]
async fn creates_release_and_reports_url() {
  let server = MockServer::start().await;
  mock_release_endpoint(&server).await;

  let response = plugin_without_env().execute(&execute_request(&server, json!({}))).await;

  assert!(response.success, "error: {}", response.error);
  assert!(
    response.message.starts_with("Created GitLab release:"),
    "message: {}",
    response.message
  );
  let release_url = response.outputs["release_url"].as_str().expect("release_url output");
  assert!(
    release_url.ends_with("/group/project/-/releases/v1.0.0"),
    "release_url: {}",
    release_url
  );
  assert_eq!(response.outputs["tag_name"], "v1.0.0");
  assert_eq!(response.outputs["project_id"], "group/project");
  assert_eq!(response.outputs["name"], "Release 1.0.0");
}

#[tokio::test]
async fn sends_milestones_and_asset_links_in_the_create_request() {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path_regex(r"^/api/v4/projects/.+/releases$"))
    .and(body_partial_json(json!({
      "name": "Release 1.0.0",
      "tag_name": "v1.0.0",
      "ref": "v1.0.0",
      "milestones": ["v1.0.0", "Q4-2024"],
      "assets": {
        "links": [
          { "name": "Download", "url": "https://example.com/download", "link_type": "package" },
          { "name": "Docs", "url": "https://docs.example.com", "filepath": "/docs" },
        ],
      },
    })))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!({
      "tag_name": "v1.0.0",
      "name": "Release 1.0.0",
    })))
    .expect(1)
    .mount(&server)
    .await;

  let request = execute_request(
    &server,
    json!({
      "milestones": ["v1.0.0", "Q4-2024"],
      "asset_links": [
        { "name": "Download", "url": "https://example.com/download", "link_type": "package" },
        { "name": "Docs", "url": "https://docs.example.com", "filepath": "/docs" },
      ],
    }),
  );

  let response = plugin_without_env().execute(&request).await;
  assert!(response.success, "error: {}", response.error);
}

#[tokio::test]
async fn api_failure_fails_the_whole_operation() {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path_regex(r"^/api/v4/projects/.+/releases$"))
    .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error": "Internal Server Error"}"#))
    .mount(&server)
    .await;

  let response = plugin_without_env().execute(&execute_request(&server, json!({}))).await;

  assert!(!response.success);
  assert!(
    response.error.contains("failed to create release"),
    "error: {}",
    response.error
  );
}

#[tokio::test]
async fn uploads_assets_and_records_artifacts() -> Result<()> {
  let server = MockServer::start().await;
  mock_release_endpoint(&server).await;
  mock_package_endpoint(&server).await;

  let workspace = AssetWorkspace::new()?;
  let content = b"test asset content";
  workspace.add_asset("app.zip", content)?;
  let _cwd = enter_dir(&workspace.path)?;

  let request = execute_request(&server, json!({ "assets": ["app.zip"] }));
  let response = plugin_without_env().execute(&request).await;

  assert!(response.success, "error: {}", response.error);
  assert_eq!(response.artifacts.len(), 1);
  assert_eq!(response.artifacts[0].name, "app.zip");
  assert_eq!(response.artifacts[0].artifact_type, "generic_package");
  assert_eq!(response.artifacts[0].size, content.len() as i64);
  Ok(())
}

#[tokio::test]
async fn failed_upload_skips_the_asset_but_keeps_the_release() -> Result<()> {
  let server = MockServer::start().await;
  mock_release_endpoint(&server).await;

  Mock::given(method("PUT"))
    .and(path_regex(r"^/api/v4/projects/.+/packages/generic/.+$"))
    .respond_with(ResponseTemplate::new(500))
    .mount(&server)
    .await;

  let workspace = AssetWorkspace::new()?;
  workspace.add_asset("app.zip", b"test asset content")?;
  let _cwd = enter_dir(&workspace.path)?;

  let request = execute_request(&server, json!({ "assets": ["app.zip"] }));
  let response = plugin_without_env().execute(&request).await;

  assert!(response.success, "error: {}", response.error);
  assert!(response.artifacts.is_empty());
  Ok(())
}

#[tokio::test]
async fn missing_asset_skips_without_failing_the_release() -> Result<()> {
  let server = MockServer::start().await;
  mock_release_endpoint(&server).await;

  let workspace = AssetWorkspace::new()?;
  let _cwd = enter_dir(&workspace.path)?;

  let request = execute_request(&server, json!({ "assets": ["nonexistent.zip"] }));
  let response = plugin_without_env().execute(&request).await;

  assert!(response.success, "error: {}", response.error);
  assert!(response.artifacts.is_empty());
  Ok(())
}

#[tokio::test]
async fn traversal_asset_is_rejected_without_failing_the_release() -> Result<()> {
  let server = MockServer::start().await;
  mock_release_endpoint(&server).await;

  let workspace = AssetWorkspace::new()?;
  let _cwd = enter_dir(&workspace.path)?;

  let request = execute_request(&server, json!({ "assets": ["../outside.zip"] }));
  let response = plugin_without_env().execute(&request).await;

  assert!(response.success, "error: {}", response.error);
  assert!(response.artifacts.is_empty());
  Ok(())
}

#[tokio::test]
async fn partial_upload_failure_keeps_earlier_artifacts() -> Result<()> {
  let server = MockServer::start().await;
  mock_release_endpoint(&server).await;

  // first.zip uploads fine; second.zip hits a server error
  Mock::given(method("PUT"))
    .and(path_regex(r"^/api/v4/projects/.+/packages/generic/.+/first\.zip$"))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "message": "201 Created" })))
    .mount(&server)
    .await;
  Mock::given(method("PUT"))
    .and(path_regex(r"^/api/v4/projects/.+/packages/generic/.+/second\.zip$"))
    .respond_with(ResponseTemplate::new(500))
    .mount(&server)
    .await;

  let workspace = AssetWorkspace::new()?;
  workspace.add_asset("first.zip", b"first")?;
  workspace.add_asset("second.zip", b"second")?;
  let _cwd = enter_dir(&workspace.path)?;

  let request = execute_request(&server, json!({ "assets": ["first.zip", "second.zip"] }));
  let response = plugin_without_env().execute(&request).await;

  assert!(response.success, "error: {}", response.error);
  assert_eq!(response.artifacts.len(), 1);
  assert_eq!(response.artifacts[0].name, "first.zip");
  Ok(())
}

#[tokio::test]
async fn upload_asset_reports_name_type_and_size() -> Result<()> {
  let server = MockServer::start().await;
  mock_package_endpoint(&server).await;

  let workspace = AssetWorkspace::new()?;
  let content = b"test file content for upload";
  workspace.add_asset("test-asset.zip", content)?;
  let _cwd = enter_dir(&workspace.path)?;

  let client = GitLabClient::new(&server.uri(), "glpat-test", DEFAULT_TIMEOUT).expect("build client");
  let artifact = release::upload_asset(&client, "group/project", "v1.0.0", "test-asset.zip")
    .await
    .expect("upload succeeds");

  assert_eq!(artifact.name, "test-asset.zip");
  assert_eq!(artifact.artifact_type, "generic_package");
  assert_eq!(artifact.size, content.len() as i64);
  Ok(())
}

#[tokio::test]
async fn upload_asset_propagates_api_failure() -> Result<()> {
  let server = MockServer::start().await;

  Mock::given(method("PUT"))
    .and(path_regex(r"^/api/v4/projects/.+/packages/generic/.+$"))
    .respond_with(ResponseTemplate::new(500))
    .mount(&server)
    .await;

  let workspace = AssetWorkspace::new()?;
  workspace.add_asset("test-asset.zip", b"content")?;
  let _cwd = enter_dir(&workspace.path)?;

  let client = GitLabClient::new(&server.uri(), "glpat-test", DEFAULT_TIMEOUT).expect("build client");
  let err = release::upload_asset(&client, "group/project", "v1.0.0", "test-asset.zip")
    .await
    .unwrap_err();

  assert!(err.to_string().contains("HTTP 500"), "error: {}", err);
  Ok(())
}
