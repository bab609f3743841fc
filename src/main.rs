use clap::{Parser, Subcommand};
use gitlab_release_plugin::core::config::{load_raw_config, raw_config_from_json};
use gitlab_release_plugin::core::context::ReleaseContext;
use gitlab_release_plugin::core::error::{ExitCode, PluginError, PluginResult, print_error};
use gitlab_release_plugin::hooks::Hook;
use gitlab_release_plugin::plugin::{ExecuteRequest, GitLabPlugin};
use serde_json::{Map, Value};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

/// Create GitLab releases and upload assets from pipeline hooks
#[derive(Parser)]
#[command(name = "gitlab-release-plugin")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print plugin identity, handled hooks, and the config schema
  Info,

  /// Validate a raw plugin configuration
  Validate {
    /// Config file (TOML or JSON); reads JSON from stdin when omitted
    #[arg(long)]
    config: Option<PathBuf>,
  },

  /// Execute a lifecycle hook
  Execute {
    /// Hook name (e.g. post-publish)
    #[arg(long)]
    hook: String,

    /// Config file (TOML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Release context file (JSON)
    #[arg(long)]
    context: Option<PathBuf>,

    /// Show what would happen without calling the API
    #[arg(long)]
    dry_run: bool,

    /// Per-request timeout for GitLab API calls
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Info => run_info(),
    Commands::Validate { config } => run_validate(config),
    Commands::Execute {
      hook,
      config,
      context,
      dry_run,
      timeout_secs,
    } => run_execute(hook, config, context, dry_run, timeout_secs).await,
  };

  match result {
    Ok(code) => std::process::exit(code),
    Err(err) => handle_error(err),
  }
}

fn handle_error(err: PluginError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}

fn run_info() -> PluginResult<i32> {
  let info = GitLabPlugin::new().info();
  println!("{}", serde_json::to_string_pretty(&info)?);
  Ok(0)
}

fn run_validate(config: Option<PathBuf>) -> PluginResult<i32> {
  let raw = load_config_input(config)?;
  let report = GitLabPlugin::new().validate(&raw);
  println!("{}", serde_json::to_string_pretty(&report)?);

  if report.valid {
    Ok(0)
  } else {
    Ok(ExitCode::Validation.as_i32())
  }
}

async fn run_execute(
  hook: String,
  config: Option<PathBuf>,
  context: Option<PathBuf>,
  dry_run: bool,
  timeout_secs: u64,
) -> PluginResult<i32> {
  let hook = Hook::parse(&hook)
    .ok_or_else(|| PluginError::with_help(format!("Unknown hook: {}", hook), "Run `info` to list handled hooks."))?;

  let raw_config = match config {
    Some(path) => load_raw_config(&path)?,
    None => Map::new(),
  };

  let release_context = match context {
    Some(path) => {
      let content = std::fs::read_to_string(&path)
        .map_err(|e| PluginError::message(format!("Failed to read context from {}: {}", path.display(), e)))?;
      serde_json::from_str::<ReleaseContext>(&content)?
    }
    None => ReleaseContext::default(),
  };

  let plugin = GitLabPlugin::with_credentials(
    gitlab_release_plugin::core::credentials::EnvCredentials,
    Duration::from_secs(timeout_secs),
  );
  let request = ExecuteRequest {
    hook,
    config: raw_config,
    context: release_context,
    dry_run,
  };

  let response = plugin.execute(&request).await;
  println!("{}", serde_json::to_string_pretty(&response)?);

  if response.success { Ok(0) } else { Ok(ExitCode::User.as_i32()) }
}

/// Raw config from a file, or JSON piped on stdin
fn load_config_input(config: Option<PathBuf>) -> PluginResult<Map<String, Value>> {
  match config {
    Some(path) => load_raw_config(&path),
    None => {
      let mut content = String::new();
      std::io::stdin().read_to_string(&mut content)?;
      if content.trim().is_empty() {
        return Ok(Map::new());
      }
      raw_config_from_json(&content)
    }
  }
}
