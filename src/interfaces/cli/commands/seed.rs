//! seed 命令：带外创建账户

use colored::Colorize;

use super::prompt::get_password;
use crate::errors::GeoTrackerError;
use crate::interfaces::cli::CliError;
use crate::services::register_user;
use crate::storage::StorageFactory;

pub const DEMO_EMAIL: &str = "test@example.com";
pub const DEMO_PASSWORD: &str = "password123";

pub async fn run_seed(
    email: String,
    password: Option<String>,
    stdin: bool,
    demo: bool,
) -> Result<(), CliError> {
    let (email, password) = if demo {
        (DEMO_EMAIL.to_string(), DEMO_PASSWORD.to_string())
    } else {
        let password = get_password(password, stdin, true)?;
        (email, password)
    };

    let storage = StorageFactory::create().await?;

    match register_user(&storage, &email, &password).await {
        Ok(user) => {
            println!(
                "{} Created user {} (id {})",
                "✓".bold().green(),
                user.email.cyan(),
                user.id
            );
            Ok(())
        }
        Err(GeoTrackerError::AlreadyExists(_)) => Err(CliError::CommandError(format!(
            "User {} already exists",
            email
        ))),
        Err(GeoTrackerError::InvalidRequest(msg)) => Err(CliError::ParseError(msg)),
        Err(e) => Err(e.into()),
    }
}
