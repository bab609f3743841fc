//! Structural and semantic validation of the raw configuration
//!
//! Runs directly against the untyped map, independently of normalization, to
//! surface the precise diagnostics (missing vs. wrong type vs. bad format vs.
//! bad enum value) that `Config::parse` intentionally swallows. All checks
//! accumulate; the report never short-circuits.

use crate::core::config::LinkType;
use crate::core::credentials::{CredentialSource, TOKEN_ENV_FALLBACK, TOKEN_ENV_PRIMARY, resolve_token};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Machine-readable validation error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCode {
  Required,
  Format,
  Type,
  Enum,
}

impl fmt::Display for ErrorCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      ErrorCode::Required => "required",
      ErrorCode::Format => "format",
      ErrorCode::Type => "type",
      ErrorCode::Enum => "enum",
    };
    write!(f, "{}", s)
  }
}

/// One field-addressable validation error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
  /// Dotted/indexed path to the offending field (e.g. `asset_links[0].url`)
  pub field: String,

  /// Error category
  pub code: ErrorCode,

  /// Human-readable explanation
  pub message: String,
}

impl ValidationError {
  fn new(field: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      code,
      message: message.into(),
    }
  }
}

/// Result of validating a raw configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
  /// True iff no errors were found
  pub valid: bool,

  /// Errors in check order; within array checks, in ascending index order
  pub errors: Vec<ValidationError>,
}

/// Validate a raw configuration map
///
/// Check order: token resolution, base_url format, assets, milestones,
/// asset_links. `null` entries read as absent (hosts serialize unset keys
/// that way); any other non-array value for an array field is a type error.
pub fn validate(raw: &Map<String, Value>, creds: &dyn CredentialSource) -> ValidationReport {
  let mut errors = Vec::new();

  let config_token = raw.get("token").and_then(Value::as_str).unwrap_or_default();
  if resolve_token(config_token, creds).is_none() {
    errors.push(ValidationError::new(
      "token",
      ErrorCode::Required,
      format!(
        "GitLab token is required: set token in config or the {} / {} environment variable",
        TOKEN_ENV_PRIMARY, TOKEN_ENV_FALLBACK
      ),
    ));
  }

  if let Some(base_url) = raw.get("base_url").and_then(Value::as_str)
    && !base_url.is_empty()
    && !base_url.starts_with("http://")
    && !base_url.starts_with("https://")
  {
    errors.push(ValidationError::new(
      "base_url",
      ErrorCode::Format,
      "base_url must start with http:// or https://",
    ));
  }

  check_string_array(raw, "assets", &mut errors);
  check_string_array(raw, "milestones", &mut errors);
  check_asset_links(raw, &mut errors);

  ValidationReport {
    valid: errors.is_empty(),
    errors,
  }
}

/// Require an array of strings; index each offending element
fn check_string_array(raw: &Map<String, Value>, field: &str, errors: &mut Vec<ValidationError>) {
  match raw.get(field) {
    None | Some(Value::Null) => {}
    Some(Value::Array(items)) => {
      for (i, item) in items.iter().enumerate() {
        if !item.is_string() {
          errors.push(ValidationError::new(
            format!("{}[{}]", field, i),
            ErrorCode::Type,
            format!("{}[{}] must be a string", field, i),
          ));
        }
      }
    }
    Some(_) => {
      errors.push(ValidationError::new(
        field,
        ErrorCode::Type,
        format!("{} must be an array of strings", field),
      ));
    }
  }
}

/// Validate asset_links entries
///
/// Non-map elements are skipped without error: they cannot be interpreted at
/// all, mirroring the normalizer's silent drop. Map-shaped elements must carry
/// non-empty name and url, and a valid link_type when one is given.
fn check_asset_links(raw: &Map<String, Value>, errors: &mut Vec<ValidationError>) {
  let items = match raw.get("asset_links") {
    None | Some(Value::Null) => return,
    Some(Value::Array(items)) => items,
    Some(_) => {
      errors.push(ValidationError::new(
        "asset_links",
        ErrorCode::Type,
        "asset_links must be an array of link objects",
      ));
      return;
    }
  };

  for (i, item) in items.iter().enumerate() {
    let Some(entry) = item.as_object() else {
      continue;
    };

    let name = entry.get("name").and_then(Value::as_str).unwrap_or_default();
    if name.is_empty() {
      errors.push(ValidationError::new(
        format!("asset_links[{}].name", i),
        ErrorCode::Required,
        format!("asset_links[{}].name is required", i),
      ));
    }

    let url = entry.get("url").and_then(Value::as_str).unwrap_or_default();
    if url.is_empty() {
      errors.push(ValidationError::new(
        format!("asset_links[{}].url", i),
        ErrorCode::Required,
        format!("asset_links[{}].url is required", i),
      ));
    }

    if let Some(link_type) = entry.get("link_type").and_then(Value::as_str)
      && !link_type.is_empty()
      && LinkType::parse(link_type).is_none()
    {
      errors.push(ValidationError::new(
        format!("asset_links[{}].link_type", i),
        ErrorCode::Enum,
        format!(
          "asset_links[{}].link_type must be one of: {}",
          i,
          LinkType::VALUES.join(", ")
        ),
      ));
    }
  }
}
