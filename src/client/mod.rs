//! Terminal client for the geotracker API
//!
//! ```text
//! CLI command ──→ ClientApp (state machine) ──→ GeoTrackerApi ──→ HTTP server
//!                       └→ SessionStore (token file)
//! ```
//!
//! The state machine never talks HTTP directly, so tests drive it through a
//! fake [`GeoTrackerApi`].

mod app;
mod http;
pub mod render;
mod session;

pub use app::{Activity, ClientApp, ClientState};
pub use http::{ApiClient, GeoTrackerApi};
pub use session::{Session, SessionStore};

use std::fmt;

// ============ ClientError ============

/// Errors from the client layer
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Server answered with a non-2xx status and an `{"error": ...}` body
    Http { status: u16, message: String },
    /// Connection refused, DNS failure, timeout...
    Transport(String),
    /// Response body did not match the expected shape
    Decode(String),
    /// Session file could not be read or written
    Session(String),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Http { status: 401, .. })
    }

    /// 面向用户的提示：服务端消息优先，其它情况使用调用方给的兜底文案
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Http { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Transport(_) => format!("{} (server unreachable)", fallback),
            _ => fallback.to_string(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http { status, message } => write!(f, "HTTP {}: {}", status, message),
            ClientError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ClientError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            ClientError::Session(msg) => write!(f, "Session file error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Session(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Session(err.to_string())
    }
}

impl From<ClientError> for crate::interfaces::cli::CliError {
    fn from(err: ClientError) -> Self {
        crate::interfaces::cli::CliError::CommandError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ClientError::Http {
            status: 400,
            message: "Invalid IP address".into(),
        };
        assert_eq!(err.user_message("Failed"), "Invalid IP address");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_user_message_fallback() {
        let err = ClientError::Decode("eof".into());
        assert_eq!(err.user_message("Login failed"), "Login failed");

        let err = ClientError::Transport("connection refused".into());
        assert!(err.user_message("Login failed").starts_with("Login failed"));
    }

    #[test]
    fn test_is_unauthorized() {
        let err = ClientError::Http {
            status: 401,
            message: "Invalid token".into(),
        };
        assert!(err.is_unauthorized());
    }
}
