//! Drupal Agent
//!
//! Natural-language command understanding for a Drupal operations agent.
//! It includes:
//! - The intent layer: pattern rules, parameter extraction, generative fallback
//! - Configuration loading
//! - The `drupal-agent` command-line interface

pub mod commands;
pub mod models;
pub mod services;
pub mod utils;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use models::AgentConfig;
pub use services::intent::{FallbackResolver, IntentParser};
pub use utils::error::{AppError, AppResult};

/// Drupal Agent CLI
#[derive(Debug, Parser)]
#[command(name = "drupal-agent")]
#[command(about = "Understand natural-language Drupal operations commands", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DRUPAL_AGENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a command into an intent and parameters
    Parse(commands::ParseArgs),

    /// Show the effective configuration
    Config,

    /// Check the AI provider is reachable
    Check(commands::CheckArgs),
}

/// Run using the current process arguments.
pub async fn run() -> AppResult<ExitCode> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> AppResult<ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Logs go to stderr so stdout stays JSON
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = AgentConfig::load(cli.config.as_deref())?;

    let success = match cli.command {
        Commands::Parse(args) => commands::parse::execute(args, &config).await?,
        Commands::Config => commands::config::execute(&config)?,
        Commands::Check(args) => commands::check::execute(args, &config).await?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_parse_subcommand() {
        let cli = Cli::try_parse_from([
            "drupal-agent",
            "parse",
            "--no-fallback",
            "--ai-provider",
            "openai",
            "clear",
            "cache",
        ])
        .unwrap();

        match cli.command {
            Commands::Parse(args) => {
                assert!(args.no_fallback);
                assert_eq!(args.ai_provider.as_deref(), Some("openai"));
                assert_eq!(args.command, vec!["clear", "cache"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_requires_command_text() {
        assert!(Cli::try_parse_from(["drupal-agent", "parse"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "drupal-agent",
            "--verbose",
            "--config",
            "/tmp/agent.toml",
            "check",
            "--provider",
            "anthropic",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/agent.toml")));
        assert!(matches!(cli.command, Commands::Check(_)));
    }
}
