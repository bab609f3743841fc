//! Token lookup with injectable environment access
//!
//! Token precedence is fixed: config `token`, then `GITLAB_TOKEN`, then
//! `GL_TOKEN`. Environment access goes through `CredentialSource` so tests can
//! supply deterministic values without touching process-wide state.

use std::collections::HashMap;

/// Primary token environment variable
pub const TOKEN_ENV_PRIMARY: &str = "GITLAB_TOKEN";

/// Alternate token environment variable
pub const TOKEN_ENV_FALLBACK: &str = "GL_TOKEN";

/// Source of named credentials
pub trait CredentialSource {
  /// Look up a credential by name; empty values read as absent
  fn get(&self, name: &str) -> Option<String>;
}

/// Process-environment credential source
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
  fn get(&self, name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
  }
}

/// Fixed in-memory credential source
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
  values: HashMap<String, String>,
}

impl StaticCredentials {
  /// Empty source (no credentials resolvable)
  pub fn empty() -> Self {
    Self::default()
  }

  /// Add a named credential
  pub fn with(mut self, name: &str, value: &str) -> Self {
    self.values.insert(name.to_string(), value.to_string());
    self
  }
}

impl CredentialSource for StaticCredentials {
  fn get(&self, name: &str) -> Option<String> {
    self.values.get(name).cloned().filter(|v| !v.is_empty())
  }
}

/// Resolve the API token: config token first, then the two env names
pub fn resolve_token(config_token: &str, creds: &dyn CredentialSource) -> Option<String> {
  if !config_token.is_empty() {
    return Some(config_token.to_string());
  }
  creds
    .get(TOKEN_ENV_PRIMARY)
    .or_else(|| creds.get(TOKEN_ENV_FALLBACK))
}
