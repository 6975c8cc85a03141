//! Cancel command implementation.
//!
//! Cancels a tracked recovery session by id. A session hydrated from a
//! previous process carries no cancellation token, so cancelling it only
//! marks it cancelled and stops tracking it; the server-side search, if
//! still running, is unaffected either way.

use std::path::{Path, PathBuf};

use dialoguer::Confirm;

use crate::cli::args::CancelArgs;
use crate::error::Result;
use crate::session::{RecoverySessionId, RecoverySessionStore, SessionFile};
use crate::ui::Console;

use super::dispatcher::{Command, CommandResult};

/// The cancel command implementation.
pub struct CancelCommand {
    state_dir: PathBuf,
    args: CancelArgs,
}

impl CancelCommand {
    /// Create a new cancel command.
    pub fn new(state_dir: &Path, args: CancelArgs) -> Self {
        Self {
            state_dir: state_dir.to_path_buf(),
            args,
        }
    }
}

impl Command for CancelCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let Some(session_id) = RecoverySessionId::parse(&self.args.session_id) else {
            console.error(&format!(
                "'{}' is not a valid session id",
                self.args.session_id
            ));
            return Ok(CommandResult::failure(1));
        };

        let mut store =
            RecoverySessionStore::with_persistence(SessionFile::in_dir(&self.state_dir));

        let Some(session) = store.session_by_id(&session_id) else {
            console.error(&format!("No tracked session with id {}", session_id));
            return Ok(CommandResult::failure(1));
        };

        if !session.is_active() {
            console.message(&format!("Session {} is already {}.", session_id, session.phase));
            return Ok(CommandResult::success());
        }

        let label = format!("{} {}", session.entity_kind, session.entity_id);
        if !self.args.yes {
            let confirmed = Confirm::new()
                .with_prompt(format!("Cancel recovery for {}?", label))
                .default(false)
                .interact()
                .unwrap_or(false);
            if !confirmed {
                console.message("Leaving the session untouched.");
                return Ok(CommandResult::success());
            }
        }

        store.cancel_recovery(&session_id);
        console.success(&format!("Cancelled recovery for {}.", label));
        console.hint("The archive search may still finish server-side; it is no longer tracked.");
        Ok(CommandResult::success())
    }
}
