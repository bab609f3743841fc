//! Release lifecycle hooks
//!
//! The orchestrator drives plugins through a fixed set of lifecycle points.
//! This plugin only acts on `post-publish` (and acknowledges `on-success` /
//! `on-error`); every other hook is answered with a not-handled success so the
//! pipeline keeps moving.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle hooks recognized by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hook {
  PreInit,
  PostInit,
  PrePlan,
  PostPlan,
  PreVersion,
  PostVersion,
  PreNotes,
  PostNotes,
  PreApprove,
  PostApprove,
  PrePublish,
  PostPublish,
  OnSuccess,
  OnError,
}

impl Hook {
  /// Wire name (kebab-case)
  pub fn as_str(self) -> &'static str {
    match self {
      Hook::PreInit => "pre-init",
      Hook::PostInit => "post-init",
      Hook::PrePlan => "pre-plan",
      Hook::PostPlan => "post-plan",
      Hook::PreVersion => "pre-version",
      Hook::PostVersion => "post-version",
      Hook::PreNotes => "pre-notes",
      Hook::PostNotes => "post-notes",
      Hook::PreApprove => "pre-approve",
      Hook::PostApprove => "post-approve",
      Hook::PrePublish => "pre-publish",
      Hook::PostPublish => "post-publish",
      Hook::OnSuccess => "on-success",
      Hook::OnError => "on-error",
    }
  }

  /// Parse a wire name
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "pre-init" => Some(Hook::PreInit),
      "post-init" => Some(Hook::PostInit),
      "pre-plan" => Some(Hook::PrePlan),
      "post-plan" => Some(Hook::PostPlan),
      "pre-version" => Some(Hook::PreVersion),
      "post-version" => Some(Hook::PostVersion),
      "pre-notes" => Some(Hook::PreNotes),
      "post-notes" => Some(Hook::PostNotes),
      "pre-approve" => Some(Hook::PreApprove),
      "post-approve" => Some(Hook::PostApprove),
      "pre-publish" => Some(Hook::PrePublish),
      "post-publish" => Some(Hook::PostPublish),
      "on-success" => Some(Hook::OnSuccess),
      "on-error" => Some(Hook::OnError),
      _ => None,
    }
  }
}

impl fmt::Display for Hook {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
