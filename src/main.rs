mod commands;
mod config;
mod drivers;
mod error;
mod services;
mod transport;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use frames::ErrorCode;
use tracing_subscriber::EnvFilter;

use crate::config::CellConfig;
use crate::error::CellError;

#[derive(Debug, Parser)]
#[command(name = "mapcell", about = "Headless map-building cell: configuration form and map view")]
struct Cli {
    /// Host websocket URL.
    #[arg(long, env = "MAPCELL_HOST_URL")]
    host_url: Option<String>,

    /// Cell identifier stamped on outbound frames. Random when omitted.
    #[arg(long, env = "MAPCELL_CELL_ID")]
    cell_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the configuration form. UI events are read from stdin.
    Form,
    /// Run the map view. Engine events are read from stdin.
    Map,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "mapcell stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CellError> {
    let mut config = CellConfig::from_env()?;
    if cli.host_url.is_some() {
        config.host_url = cli.host_url;
    }
    let cell_id = cli.cell_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    tracing::info!(%cell_id, wire = ?config.wire, "starting cell");

    match cli.command {
        Command::Form => drivers::form::run(&config, cell_id).await,
        Command::Map => drivers::map::run(&config, cell_id).await,
    }
}
