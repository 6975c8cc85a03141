//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// tubevault - Recover metadata for unavailable videos and channels.
#[derive(Debug, Parser)]
#[command(name = "tubevault")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding tubevault state (overrides the platform default)
    #[arg(long, global = true, env = "TUBEVAULT_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Base URL of the local sync service API
    #[arg(
        long,
        global = true,
        env = "TUBEVAULT_API_URL",
        default_value = "http://127.0.0.1:8970"
    )]
    pub api_url: String,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Recover metadata for an unavailable video or channel
    Recover(RecoverArgs),

    /// Show tracked recovery sessions (default if no command specified)
    Status(StatusArgs),

    /// Cancel a tracked recovery session
    Cancel(CancelArgs),

    /// Stop tracking recovery sessions
    Clear(ClearArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `recover` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RecoverArgs {
    /// Identifier of the video or channel to recover
    pub entity_id: String,

    /// Kind of entity: video or channel
    #[arg(short, long, default_value = "video")]
    pub kind: String,

    /// Display title, shown in status output
    #[arg(long)]
    pub title: Option<String>,

    /// Earliest archive snapshot year to consider
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Latest archive snapshot year to consider
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Cancel the recovery after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, clap::Args)]
pub struct StatusArgs {
    /// Show search windows and failure details
    #[arg(long)]
    pub wide: bool,
}

/// Arguments for the `cancel` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CancelArgs {
    /// Session id to cancel (as shown by `tubevault status`)
    pub session_id: String,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the `clear` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ClearArgs {
    /// Session id to stop tracking
    pub session_id: Option<String>,

    /// Stop tracking every session
    #[arg(long, conflicts_with = "session_id")]
    pub all: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_recover_with_window() {
        let cli = Cli::parse_from([
            "tubevault",
            "recover",
            "dQw4w9WgXcQ",
            "--kind",
            "video",
            "--start-year",
            "2019",
            "--end-year",
            "2024",
        ]);

        match cli.command {
            Some(Commands::Recover(args)) => {
                assert_eq!(args.entity_id, "dQw4w9WgXcQ");
                assert_eq!(args.kind, "video");
                assert_eq!(args.start_year, Some(2019));
                assert_eq!(args.end_year, Some(2024));
                assert!(args.timeout.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::parse_from(["tubevault"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn clear_all_conflicts_with_session_id() {
        let result =
            Cli::try_parse_from(["tubevault", "clear", "rcv_1_0011223344556677", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["tubevault", "status", "--quiet", "--no-color"]);
        assert!(cli.quiet);
        assert!(cli.no_color);
    }
}
