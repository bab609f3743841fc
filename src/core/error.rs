//! Error types for the GitLab release plugin with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages. Failures that the host orchestrator must be able to
//! match on carry fixed, literal substrings in their display output.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for the CLI adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (network, I/O)
  System = 2,
  /// Validation failure (config validation reported errors)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for the plugin
#[derive(Debug)]
pub enum PluginError {
  /// Configuration errors (unreadable or unparseable config input)
  Config(ConfigError),

  /// Asset path security errors
  Path(PathError),

  /// GitLab API errors (HTTP transport or non-success responses)
  Api(ApiError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional help
  Message { message: String, help: Option<String> },
}

impl PluginError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PluginError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    PluginError::Message {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      PluginError::Config(_) => ExitCode::User,
      PluginError::Path(_) => ExitCode::Validation,
      PluginError::Api(_) => ExitCode::System,
      PluginError::Io(_) => ExitCode::System,
      PluginError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PluginError::Config(e) => e.help_message(),
      PluginError::Path(e) => e.help_message(),
      PluginError::Api(_) => None,
      PluginError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for PluginError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PluginError::Config(e) => write!(f, "{}", e),
      PluginError::Path(e) => write!(f, "{}", e),
      PluginError::Api(e) => write!(f, "{}", e),
      PluginError::Io(e) => write!(f, "I/O error: {}", e),
      PluginError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for PluginError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PluginError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PluginError {
  fn from(err: io::Error) -> Self {
    PluginError::Io(err)
  }
}

impl From<String> for PluginError {
  fn from(msg: String) -> Self {
    PluginError::message(msg)
  }
}

impl From<&str> for PluginError {
  fn from(msg: &str) -> Self {
    PluginError::message(msg)
  }
}

impl From<serde_json::Error> for PluginError {
  fn from(err: serde_json::Error) -> Self {
    PluginError::Config(ConfigError::Parse {
      detail: format!("JSON error: {}", err),
    })
  }
}

impl From<toml_edit::de::Error> for PluginError {
  fn from(err: toml_edit::de::Error) -> Self {
    PluginError::Config(ConfigError::Parse {
      detail: format!("TOML deserialization error: {}", err),
    })
  }
}

impl From<toml_edit::TomlError> for PluginError {
  fn from(err: toml_edit::TomlError) -> Self {
    PluginError::Config(ConfigError::Parse {
      detail: format!("TOML parse error: {}", err),
    })
  }
}

impl From<reqwest::Error> for PluginError {
  fn from(err: reqwest::Error) -> Self {
    PluginError::Api(ApiError::Transport {
      detail: err.to_string(),
    })
  }
}

impl From<PathError> for PluginError {
  fn from(err: PathError) -> Self {
    PluginError::Path(err)
  }
}

impl From<ApiError> for PluginError {
  fn from(err: ApiError) -> Self {
    PluginError::Api(err)
  }
}

/// Configuration input errors
#[derive(Debug)]
pub enum ConfigError {
  /// Config file not found
  NotFound { path: PathBuf },

  /// Config file could not be parsed
  Parse { detail: String },

  /// Config root is not a key/value map
  NotAMap,
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Pass --config with a path to a TOML or JSON config file, or pipe JSON on stdin.".to_string())
      }
      ConfigError::NotAMap => Some("The config document must be a table/object of plugin settings.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Config file not found: {}", path.display())
      }
      ConfigError::Parse { detail } => write!(f, "{}", detail),
      ConfigError::NotAMap => write!(f, "Config document is not a key/value map"),
    }
  }
}

/// Asset path security errors
///
/// The display strings are part of the host contract: callers match on the
/// substrings "cannot be empty", "path traversal", "not accessible", and
/// "directory" to classify skipped assets.
#[derive(Debug)]
pub enum PathError {
  /// Empty asset path
  Empty,

  /// Path escapes the working directory (textually or after symlink resolution)
  Traversal { path: String },

  /// Path does not exist or cannot be statted
  NotAccessible { path: String, detail: String },

  /// Path resolves to a directory; only regular files may be uploaded
  IsDirectory { path: String },
}

impl PathError {
  fn help_message(&self) -> Option<String> {
    match self {
      PathError::Traversal { .. } => {
        Some("Asset paths must stay inside the working directory the release runs from.".to_string())
      }
      PathError::IsDirectory { .. } => Some("Archive the directory first (zip/tar) and list the archive.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for PathError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PathError::Empty => write!(f, "asset path cannot be empty"),
      PathError::Traversal { path } => write!(f, "path traversal not allowed: {}", path),
      PathError::NotAccessible { path, detail } => {
        write!(f, "asset path not accessible: {}: {}", path, detail)
      }
      PathError::IsDirectory { path } => {
        write!(f, "asset path is a directory, not a file: {}", path)
      }
    }
  }
}

impl std::error::Error for PathError {}

/// GitLab API errors
#[derive(Debug)]
pub enum ApiError {
  /// HTTP transport failure (connect, timeout, decode)
  Transport { detail: String },

  /// Non-success HTTP status from the API
  Status { status: u16, detail: String },
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Transport { detail } => write!(f, "GitLab API request failed: {}", detail),
      ApiError::Status { status, detail } => {
        write!(f, "GitLab API returned HTTP {}: {}", status, detail)
      }
    }
  }
}

impl std::error::Error for ApiError {}

/// Result type alias for the plugin
pub type PluginResult<T> = Result<T, PluginError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PluginResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PluginResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PluginError>,
{
  fn context(self, ctx: impl Into<String>) -> PluginResult<T> {
    self.map_err(|e| {
      let inner = e.into();
      PluginError::message(format!("{}: {}", ctx.into(), inner))
    })
  }

  fn with_context<F>(self, f: F) -> PluginResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| {
      let inner = e.into();
      PluginError::message(format!("{}: {}", f(), inner))
    })
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PluginError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
