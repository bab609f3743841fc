//! Wire types for the GitLab REST API
//!
//! Request and response shapes for the two endpoints the plugin calls:
//! release creation and generic package upload. Optional fields are omitted
//! from the payload entirely rather than sent as nulls.

use crate::core::config::LinkType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body for `POST /projects/:id/releases`
#[derive(Debug, Clone, Serialize)]
pub struct CreateReleaseRequest {
  pub name: String,

  pub tag_name: String,

  #[serde(rename = "ref")]
  pub ref_name: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub released_at: Option<DateTime<Utc>>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub milestones: Option<Vec<String>>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub assets: Option<ReleaseAssets>,
}

/// Asset descriptors nested in a release creation request
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseAssets {
  pub links: Vec<ReleaseLinkRequest>,
}

/// One external link in a release creation request
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseLinkRequest {
  pub name: String,

  pub url: String,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub filepath: Option<String>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub link_type: Option<LinkType>,
}

/// Release record returned by the API (only the fields the plugin reads)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Release {
  pub tag_name: String,

  pub name: String,
}
