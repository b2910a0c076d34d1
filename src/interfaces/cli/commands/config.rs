//! config 子命令

use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;

pub fn config_management(action: ConfigCommands) -> Result<(), CliError> {
    match action {
        ConfigCommands::Generate { output, force } => {
            if std::path::Path::new(&output).exists() && !force {
                return Err(CliError::CommandError(format!(
                    "{} already exists, use --force to overwrite",
                    output
                )));
            }

            StaticConfig::default()
                .save_to_file(&output)
                .map_err(|e| CliError::CommandError(format!("Failed to write {}: {}", output, e)))?;

            println!(
                "{} Sample configuration written to {}",
                "✓".bold().green(),
                output.cyan()
            );
            Ok(())
        }
    }
}
