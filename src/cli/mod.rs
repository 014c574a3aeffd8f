//! CLI interface and argument parsing
//!
//! Operational tooling for deployments: config scaffolding and validation,
//! store status, and the clinical settings listing. Lifecycle mutations go
//! through the library API, never through the CLI.

pub mod commands;

use clap::{Parser, Subcommand};

/// Scribe - clinical note lifecycle service
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "scribe.toml", env = "SCRIBE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SCRIBE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter configuration file
    Init(commands::init::InitArgs),

    /// Validate the configuration file and optionally the store connection
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show note and draft counts from the record store
    Status(commands::status::StatusArgs),

    /// List the clinical settings table
    Settings(commands::settings::SettingsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["scribe", "status"]);
        assert_eq!(cli.config, "scribe.toml");
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["scribe", "--config", "custom.toml", "settings"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Settings(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["scribe", "--log-level", "debug", "status"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["scribe", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["scribe", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
