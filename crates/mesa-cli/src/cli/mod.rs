//! CLI command definitions for the `mesa` binary.

pub mod chat;
pub mod config;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Talk to a restaurant's assistant from the terminal.
#[derive(Parser)]
#[command(name = "mesa", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat with a restaurant's assistant.
    Chat(ChatArgs),

    /// Show the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Restaurant to chat about.
    #[arg(long, env = "MESA_RESTAURANT_ID")]
    pub restaurant_id: Option<String>,

    /// Display name used in prompts and the banner.
    #[arg(long)]
    pub restaurant_name: Option<String>,

    /// Bearer token for the chat endpoint.
    #[arg(long, env = "MESA_AUTH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Sign in with this email instead of passing a token (prompts for the password).
    #[arg(long, conflicts_with = "token")]
    pub email: Option<String>,

    /// Send requests without a bearer token.
    #[arg(long)]
    pub no_auth: bool,

    /// Print replies at once instead of revealing them progressively.
    #[arg(long)]
    pub no_stream: bool,

    /// Past messages forwarded with each request.
    #[arg(long)]
    pub history_limit: Option<usize>,

    /// Dashboard backend origin.
    #[arg(long)]
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_args() {
        let cli = Cli::parse_from([
            "mesa",
            "-v",
            "chat",
            "--restaurant-id",
            "r1",
            "--restaurant-name",
            "Chez Luigi",
            "--no-stream",
            "--history-limit",
            "2",
        ]);
        assert_eq!(cli.verbose, 1);
        let Commands::Chat(args) = cli.command else {
            panic!("expected chat command");
        };
        assert_eq!(args.restaurant_id.as_deref(), Some("r1"));
        assert_eq!(args.restaurant_name.as_deref(), Some("Chez Luigi"));
        assert!(args.no_stream);
        assert_eq!(args.history_limit, Some(2));
    }

    #[test]
    fn test_email_conflicts_with_token() {
        let result = Cli::try_parse_from([
            "mesa", "chat", "--token", "t", "--email", "chef@luigi.fr",
        ]);
        assert!(result.is_err());
    }
}
