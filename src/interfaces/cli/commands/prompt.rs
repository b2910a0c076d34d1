//! 终端输入辅助

use std::io::{self, BufRead, IsTerminal, Write};

use crate::interfaces::cli::CliError;

fn io_err(e: io::Error) -> CliError {
    CliError::CommandError(format!("Failed to read input: {}", e))
}

/// 读取一行（去掉首尾空白）
pub fn read_line(prompt: &str) -> Result<String, CliError> {
    print!("{}", prompt);
    io::stdout().flush().map_err(io_err)?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).map_err(io_err)?;
    Ok(line.trim().to_string())
}

/// 从不同来源获取密码：参数、stdin 或交互式输入
pub fn get_password(
    password: Option<String>,
    stdin: bool,
    confirm: bool,
) -> Result<String, CliError> {
    if stdin {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map_err(io_err)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    if let Some(pwd) = password {
        return Ok(pwd);
    }

    if !io::stdin().is_terminal() {
        return Err(CliError::ParseError(
            "No password provided. Use --password or --stdin flag, or run interactively."
                .to_string(),
        ));
    }

    let password = rpassword::prompt_password("Password: ").map_err(io_err)?;

    if confirm {
        let again = rpassword::prompt_password("Confirm password: ").map_err(io_err)?;
        if password != again {
            return Err(CliError::ParseError("Passwords do not match".to_string()));
        }
    }

    Ok(password)
}
