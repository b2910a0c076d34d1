//! CLI interface module
//!
//! Operator commands (`seed`, `config`) talk to the database or the file
//! system directly; client commands go through the HTTP API.

pub mod commands;

use std::fmt;

use crate::cli::Commands;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    AuthError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::AuthError(msg) => format!("Auth error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::AuthError(msg) => {
                format!("{} {}", "Auth error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::GeoTrackerError> for CliError {
    fn from(err: crate::errors::GeoTrackerError) -> Self {
        CliError::StorageError(err.format_simple())
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "`serve` is handled by the server runtime".to_string(),
        )),
        Commands::Seed {
            email,
            password,
            stdin,
            demo,
        } => commands::run_seed(email, password, stdin, demo).await,
        Commands::Config { action } => commands::config_management(action),
        client_cmd => tokio::task::spawn_blocking(move || commands::run_client_command(client_cmd))
            .await
            .map_err(|e| CliError::CommandError(format!("Client task failed: {}", e)))?,
    }
}
