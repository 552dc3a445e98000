mod auth;
mod classify;
mod cli;
mod config;
mod error;
mod model;
mod monitor;
mod orchestrator;
mod output;
mod providers;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting cidebug - CI Workflow Debugger");
    cli.execute().await?;

    Ok(())
}
