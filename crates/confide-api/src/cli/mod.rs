//! CLI command definitions for the `confide` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chats;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Real-time counselling chat relay.
#[derive(Parser)]
#[command(name = "confide", version, about, long_about = None)]
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

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "CONFIDE_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat relay server.
    Serve {
        /// Port to listen on (defaults to `port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `host` in config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Inspect or clear the persisted chat log.
    Chats {
        #[command(subcommand)]
        action: chats::ChatsCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::parse_from(["confide", "serve"]);
        assert!(matches!(cli.command, Commands::Serve { port: None, host: None }));

        let cli = Cli::parse_from(["confide", "serve", "-p", "9000", "--host", "0.0.0.0"]);
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(9000));
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn chats_clear_parses_force() {
        let cli = Cli::parse_from(["confide", "--json", "chats", "clear", "--force"]);
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Chats {
                action: chats::ChatsCommand::Clear { force: true }
            }
        ));
    }
}
