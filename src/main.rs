use clap::Parser;

use geotracker::cli::{Cli, Commands};
use geotracker::config::{get_config, init_config_from, update_config};
use geotracker::interfaces::cli::run_cli_command;
use geotracker::runtime::modes::run_server;
use geotracker::system::{init_cli_logging, init_logging};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_config_from(&cli.config);
    if let Some(server) = cli.server.clone() {
        update_config(|config| config.client.server_url = server);
    }

    match cli.command {
        None | Some(Commands::Serve) => {
            // guard 必须存活到进程结束
            let _log_guard = init_logging(&get_config().logging)?;
            run_server().await
        }
        Some(cmd) => {
            init_cli_logging();
            if let Err(e) = run_cli_command(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
