//! 交互式会话

use colored::Colorize;

use super::client::{login, print_history, print_lookup};
use super::prompt::{get_password, read_line};
use crate::client::{ApiClient, ClientApp, render};
use crate::interfaces::cli::CliError;

const HELP: &str = "\
Commands:
  search <ip>   look up an IPv4 address
  clear         look up your own address again
  history       show search history
  open <id>     look up a history entry again
  select <id>   toggle selection of a history entry
  delete        delete selected entries
  logout        forget the session
  help          show this help
  quit          leave";

/// 一条交互指令
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Search(String),
    Clear,
    History,
    Open(i64),
    Select(i64),
    Delete,
    Logout,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> ShellCommand {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return ShellCommand::Empty;
    };
    let arg = parts.next();

    match (verb.to_ascii_lowercase().as_str(), arg) {
        ("search" | "s", Some(ip)) => ShellCommand::Search(ip.to_string()),
        ("search" | "s", None) => ShellCommand::Search(String::new()),
        ("clear" | "c", _) => ShellCommand::Clear,
        ("history" | "h", _) => ShellCommand::History,
        ("open" | "o", Some(id)) => id
            .parse()
            .map(ShellCommand::Open)
            .unwrap_or_else(|_| ShellCommand::Unknown(line.to_string())),
        ("select" | "x", Some(id)) => id
            .parse()
            .map(ShellCommand::Select)
            .unwrap_or_else(|_| ShellCommand::Unknown(line.to_string())),
        ("delete" | "d", _) => ShellCommand::Delete,
        ("logout", _) => ShellCommand::Logout,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", _) => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.to_string()),
    }
}

fn report(result: Result<(), CliError>) {
    if let Err(e) = result {
        eprintln!("{}", e.format_colored());
    }
}

fn login_prompt(app: &mut ClientApp<ApiClient>) -> Result<bool, CliError> {
    if let Some(msg) = app.login_error() {
        println!("{}", msg.yellow());
    }
    let email = read_line("Email (empty to quit): ")?;
    if email.is_empty() {
        return Ok(false);
    }
    let password = get_password(None, false, false)?;
    report(login(app, &email, &password));
    Ok(true)
}

fn show_home(app: &mut ClientApp<ApiClient>) {
    // 进入主页时自动检测本机地址
    app.clear();
    report(print_lookup(app));
    if let Some(ip) = app.user_ip() {
        println!("{} {}", "Your IP:".bold(), ip.cyan());
    }
}

pub fn run_shell(mut app: ClientApp<ApiClient>) -> Result<(), CliError> {
    app.restore_session()?;

    loop {
        if !app.is_logged_in() {
            if !login_prompt(&mut app)? {
                return Ok(());
            }
            if app.is_logged_in() {
                show_home(&mut app);
                println!("{}", HELP.dimmed());
            }
            continue;
        }

        let line = read_line(&format!("{} ", "geo>".bold().blue()))?;
        match parse_command(&line) {
            ShellCommand::Search(ip) => {
                app.search(&ip);
                report(print_lookup(&app));
            }
            ShellCommand::Clear => show_home(&mut app),
            ShellCommand::History => {
                app.refresh_history();
                report(print_history(&app));
            }
            ShellCommand::Open(id) => {
                if app.history().iter().any(|e| e.id == id) {
                    app.open_history(id);
                    report(print_lookup(&app));
                } else {
                    eprintln!("No history entry {}", id);
                }
            }
            ShellCommand::Select(id) => {
                app.toggle_selection(id);
                println!("{}", render::render_history(app.history(), app.selected()));
            }
            ShellCommand::Delete => {
                if app.selected().is_empty() {
                    println!("Nothing selected");
                } else {
                    app.delete_selected();
                    report(print_history(&app));
                }
            }
            ShellCommand::Logout => {
                app.logout()?;
                println!("{} Logged out", "✓".bold().green());
            }
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => return Ok(()),
            ShellCommand::Empty => {}
            ShellCommand::Unknown(input) => {
                eprintln!("Unknown command: {} (type `help`)", input);
            }
        }
    }
}
