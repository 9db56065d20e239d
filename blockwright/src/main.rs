mod cli;
mod commands;

use anyhow::Result;
use blockwright_core::config::ObservabilityConfig;
use blockwright_core::observability::{self, TracingMode};
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mode = if cli.verbose {
        TracingMode::Verbose
    } else {
        TracingMode::Default
    };
    observability::init_tracing(&ObservabilityConfig::from_env(), mode);

    match cli.command {
        Commands::Run(args) => commands::run::run_agent(args, cli.verbose).await,
        Commands::Tools { no_memory } => commands::tools::print_tools(!no_memory),
        Commands::WorldState { world_url } => commands::world_state::show_world_state(world_url).await,
    }
}
