mod client;
mod config;
mod prompt;
mod seed;
mod shell;

pub use client::run_client_command;
pub use config::config_management;
pub use seed::run_seed;
