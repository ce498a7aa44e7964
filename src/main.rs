use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use locker_terminal::cli::{Cli, Commands, ConfigAction};
use locker_terminal::commands::{
    cmd_config_set, cmd_config_show, cmd_locations, cmd_ls, cmd_terminal, cmd_unlock,
};

const LOG_ENV: &str = "LOCKER_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let global = cli.global;
    let output = global.output();

    let result = match cli.command {
        Commands::Locations => cmd_locations(output),
        Commands::Ls { location } => cmd_ls(&global, &location).await,
        Commands::Unlock { location, code } => cmd_unlock(&global, &location, &code).await,
        Commands::Terminal { location } => cmd_terminal(&global, location.as_deref()).await,

        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(output),
            ConfigAction::Set { key, value } => cmd_config_set(&key, &value, output),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
