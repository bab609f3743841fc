//! Thin GitLab REST API client
//!
//! Two endpoints, one attempt per call, no retries. Every request is bounded
//! by the client-level timeout set at construction; a failed call surfaces
//! immediately to the caller, which decides whether the failure is fatal
//! (release creation) or skippable (a single asset upload).

pub mod types;

use crate::core::config::DEFAULT_BASE_URL;
use crate::core::error::ApiError;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use std::path::Path;
use std::time::Duration;

use types::{CreateReleaseRequest, Release};

/// Default bound for a single API request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Package name namespace for uploaded release assets
const GENERIC_PACKAGE_NAME: &str = "release";

/// GitLab API client scoped to one instance and one token
pub struct GitLabClient {
  http: reqwest::Client,
  api_base: String,
}

impl GitLabClient {
  /// Build a client for the given instance
  ///
  /// `base_url` falls back to gitlab.com when empty; a single trailing slash
  /// is stripped so path joining stays predictable.
  pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, ApiError> {
    let base = normalize_base_url(base_url);

    let mut headers = HeaderMap::new();
    let mut token_header = HeaderValue::from_str(token).map_err(|_| ApiError::Transport {
      detail: "token contains invalid header characters".to_string(),
    })?;
    token_header.set_sensitive(true);
    headers.insert("PRIVATE-TOKEN", token_header);

    let http = reqwest::Client::builder()
      .timeout(timeout)
      .default_headers(headers)
      .build()
      .map_err(|e| ApiError::Transport {
        detail: format!("failed to build HTTP client: {}", e),
      })?;

    Ok(Self {
      http,
      api_base: format!("{}/api/v4", base),
    })
  }

  /// `POST /projects/:id/releases`
  pub async fn create_release(&self, project_id: &str, request: &CreateReleaseRequest) -> Result<Release, ApiError> {
    let url = format!(
      "{}/projects/{}/releases",
      self.api_base,
      encode_project_path(project_id)
    );

    let response = self
      .http
      .post(&url)
      .json(request)
      .send()
      .await
      .map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
      return Err(status_error(status, response).await);
    }

    response.json::<Release>().await.map_err(transport)
  }

  /// `PUT /projects/:id/packages/generic/:package/:version/:file`
  ///
  /// The package version namespace is the release tag; the package name is a
  /// fixed `release` bucket. Returns the uploaded byte count.
  pub async fn upload_generic_package(
    &self,
    project_id: &str,
    tag_name: &str,
    file_name: &str,
    file_path: &Path,
  ) -> Result<i64, ApiError> {
    let metadata = tokio::fs::metadata(file_path).await.map_err(|e| ApiError::Transport {
      detail: format!("cannot stat {}: {}", file_path.display(), e),
    })?;
    let size = metadata.len() as i64;

    let file = tokio::fs::File::open(file_path).await.map_err(|e| ApiError::Transport {
      detail: format!("cannot open {}: {}", file_path.display(), e),
    })?;

    let url = format!(
      "{}/projects/{}/packages/generic/{}/{}/{}",
      self.api_base,
      encode_project_path(project_id),
      GENERIC_PACKAGE_NAME,
      encode_path_segment(tag_name),
      encode_path_segment(file_name)
    );

    let response = self
      .http
      .put(&url)
      .header(reqwest::header::CONTENT_LENGTH, size)
      .body(reqwest::Body::from(file))
      .send()
      .await
      .map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
      return Err(status_error(status, response).await);
    }

    Ok(size)
  }
}

/// Default the base URL and strip a single trailing slash
pub fn normalize_base_url(base_url: &str) -> String {
  let base = if base_url.is_empty() { DEFAULT_BASE_URL } else { base_url };
  base.strip_suffix('/').unwrap_or(base).to_string()
}

/// Encode a project path for use as a single URL path segment
///
/// GitLab accepts either the numeric ID or the URL-encoded full path, where
/// the path separator must be `%2F`.
fn encode_project_path(project_id: &str) -> String {
  encode_path_segment(project_id)
}

/// Percent-encode the characters that would break a path segment
fn encode_path_segment(segment: &str) -> String {
  let mut out = String::with_capacity(segment.len());
  for c in segment.chars() {
    match c {
      '/' => out.push_str("%2F"),
      '%' => out.push_str("%25"),
      '?' => out.push_str("%3F"),
      '#' => out.push_str("%23"),
      ' ' => out.push_str("%20"),
      _ => out.push(c),
    }
  }
  out
}

fn transport(err: reqwest::Error) -> ApiError {
  ApiError::Transport {
    detail: err.to_string(),
  }
}

async fn status_error(status: StatusCode, response: reqwest::Response) -> ApiError {
  let detail = response.text().await.unwrap_or_default();
  ApiError::Status {
    status: status.as_u16(),
    detail,
  }
}
