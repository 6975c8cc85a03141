//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, StatusArgs};
use crate::error::Result;
use crate::ui::Console;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    fn execute(&self, console: &Console) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    state_dir: PathBuf,
    api_url: String,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new(state_dir: PathBuf, api_url: String) -> Self {
        Self { state_dir, api_url }
    }

    /// Get the resolved state directory.
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Dispatch and execute a command.
    ///
    /// With no subcommand, `status` runs.
    pub fn dispatch(&self, cli: &Cli, console: &Console) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Recover(args)) => {
                let cmd = super::recover::RecoverCommand::new(
                    &self.state_dir,
                    &self.api_url,
                    args.clone(),
                );
                cmd.execute(console)
            }
            Some(Commands::Status(args)) => {
                let cmd = super::status::StatusCommand::new(&self.state_dir, args.clone());
                cmd.execute(console)
            }
            Some(Commands::Cancel(args)) => {
                let cmd = super::cancel::CancelCommand::new(&self.state_dir, args.clone());
                cmd.execute(console)
            }
            Some(Commands::Clear(args)) => {
                let cmd = super::clear::ClearCommand::new(&self.state_dir, args.clone());
                cmd.execute(console)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(console)
            }
            None => {
                let cmd =
                    super::status::StatusCommand::new(&self.state_dir, StatusArgs { wide: false });
                cmd.execute(console)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(2);
        assert!(!result.success);
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn dispatcher_remembers_state_dir() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/tmp/state"), "http://x".into());
        assert_eq!(dispatcher.state_dir(), Path::new("/tmp/state"));
    }
}
