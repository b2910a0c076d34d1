//! 通过 HTTP API 运行的客户端命令

use colored::Colorize;

use super::prompt::{get_password, read_line};
use super::shell::run_shell;
use crate::cli::Commands;
use crate::client::{ApiClient, ClientApp, GeoTrackerApi, SessionStore, render};
use crate::config::get_config;
use crate::interfaces::cli::CliError;

fn build_app() -> ClientApp<ApiClient> {
    let config = get_config();
    ClientApp::new(
        ApiClient::new(&config.client.server_url),
        SessionStore::new(config.client.session_path()),
    )
}

/// 恢复会话，未登录时报错
fn require_login<A: GeoTrackerApi>(app: &mut ClientApp<A>) -> Result<(), CliError> {
    app.restore_session()?;
    if app.is_logged_in() {
        return Ok(());
    }

    let reason = app
        .login_error()
        .map(|msg| format!("{}. ", msg))
        .unwrap_or_default();
    Err(CliError::AuthError(format!(
        "{}Run `geotracker login` first.",
        reason
    )))
}

/// 执行客户端命令（阻塞，调用方负责放到 blocking 线程）
pub fn run_client_command(cmd: Commands) -> Result<(), CliError> {
    let mut app = build_app();

    match cmd {
        Commands::Login {
            email,
            password,
            stdin,
        } => {
            let email = match email {
                Some(email) => email,
                None => read_line("Email: ")?,
            };
            let password = get_password(password, stdin, false)?;
            login(&mut app, &email, &password)
        }
        Commands::Logout => {
            app.logout()?;
            println!("{} Logged out", "✓".bold().green());
            Ok(())
        }
        Commands::Whoami => {
            require_login(&mut app)?;
            if let Some(session) = app.session() {
                println!(
                    "{} (id {})",
                    session.user.email.cyan(),
                    session.user.id
                );
            }
            if let Some(err) = app.lookup_error() {
                println!("{}", err.yellow());
            }
            Ok(())
        }
        Commands::Lookup { ip } => {
            require_login(&mut app)?;
            match ip {
                Some(ip) => app.search(ip.trim()),
                None => app.clear(),
            }
            print_lookup(&app)
        }
        Commands::History => {
            require_login(&mut app)?;
            app.refresh_history();
            print_history(&app)
        }
        Commands::Delete { ids } => {
            require_login(&mut app)?;
            for id in ids {
                if !app.selected().contains(&id) {
                    app.toggle_selection(id);
                }
            }
            app.delete_selected();
            if !app.is_logged_in() {
                return Err(CliError::AuthError(
                    app.login_error().unwrap_or("Not logged in").to_string(),
                ));
            }
            if let Some(err) = app.history_error() {
                return Err(CliError::CommandError(err.to_string()));
            }
            println!("{} History updated", "✓".bold().green());
            print_history(&app)
        }
        Commands::App => run_shell(app),
        Commands::Serve | Commands::Seed { .. } | Commands::Config { .. } => Err(
            CliError::CommandError("not a client command".to_string()),
        ),
    }
}

pub(super) fn login<A: GeoTrackerApi>(
    app: &mut ClientApp<A>,
    email: &str,
    password: &str,
) -> Result<(), CliError> {
    app.submit_login(email, password)?;

    if let Some(err) = app.login_error() {
        return Err(CliError::AuthError(err.to_string()));
    }

    if let Some(session) = app.session() {
        println!(
            "{} Logged in as {}",
            "✓".bold().green(),
            session.user.email.cyan()
        );
    }
    Ok(())
}

pub(super) fn print_lookup<A: GeoTrackerApi>(app: &ClientApp<A>) -> Result<(), CliError> {
    if !app.is_logged_in() {
        return Err(CliError::AuthError(
            app.login_error().unwrap_or("Not logged in").to_string(),
        ));
    }
    if let Some(err) = app.lookup_error() {
        return Err(CliError::CommandError(err.to_string()));
    }
    if let Some(geo) = app.geo() {
        println!("{}", render::render_geo(geo));
    }
    Ok(())
}

pub(super) fn print_history<A: GeoTrackerApi>(app: &ClientApp<A>) -> Result<(), CliError> {
    if !app.is_logged_in() {
        return Err(CliError::AuthError(
            app.login_error().unwrap_or("Not logged in").to_string(),
        ));
    }
    if let Some(err) = app.history_error() {
        return Err(CliError::CommandError(err.to_string()));
    }
    println!("{}", render::render_history(app.history(), app.selected()));
    Ok(())
}
