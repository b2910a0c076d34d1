//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// GeoTracker - IP geolocation lookups with per-user history
#[derive(Parser)]
#[command(name = "geotracker")]
#[command(version)]
#[command(about = "IP geolocation service and terminal client", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    /// Override the server URL used by client commands
    #[arg(long, short = 's', global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create a user account in the database
    Seed {
        /// Account email
        #[arg(long, default_value = "test@example.com")]
        email: String,

        /// Password (avoid: visible in shell history)
        #[arg(long, conflicts_with_all = ["stdin", "demo"])]
        password: Option<String>,

        /// Read the password from stdin
        #[arg(long, conflicts_with = "demo")]
        stdin: bool,

        /// Create the demo account test@example.com / password123
        #[arg(long)]
        demo: bool,
    },

    /// Log in and store the session token
    Login {
        /// Account email (prompted when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Read the password from stdin
        #[arg(long, conflicts_with = "password")]
        stdin: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Look up an IPv4 address, or your own address when omitted
    Lookup {
        /// IPv4 address in dotted-quad form
        ip: Option<String>,
    },

    /// List your search history, newest first
    History,

    /// Delete history entries by id
    Delete {
        /// Entry ids as shown by `history`
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },

    /// Interactive session (search, history, selection, delete)
    App,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a sample config.toml
    Generate {
        /// Output path
        #[arg(default_value = "config.example.toml")]
        output: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
