//! Mesa terminal entry point.
//!
//! Binary name: `mesa`
//!
//! Parses CLI arguments, loads `config.toml` from the data directory, then
//! dispatches to the chat loop or one of the utility commands.

mod cli;

use clap::Parser;
use clap_complete::generate;

use mesa_infra::config::load_client_config;
use mesa_infra::filesystem::resolve_data_dir;
use mesa_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "mesa", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let data_dir = resolve_data_dir();
    let config = load_client_config(&data_dir).await;

    let result = match cli.command {
        Commands::Chat(args) => cli::chat::loop_runner::run_chat_loop(config, args).await,
        Commands::Config => cli::config::show_config(&config, &data_dir, cli.json),
        Commands::Completions { .. } => Ok(()),
    };

    shutdown_tracing();
    result
}
