//! Clear command implementation.
//!
//! Drops sessions from tracking without going through the cancelled
//! phase; useful for entries left behind by an interrupted run.

use std::path::{Path, PathBuf};

use crate::cli::args::ClearArgs;
use crate::error::Result;
use crate::session::{RecoverySessionId, RecoverySessionStore, SessionFile};
use crate::ui::Console;

use super::dispatcher::{Command, CommandResult};

/// The clear command implementation.
pub struct ClearCommand {
    state_dir: PathBuf,
    args: ClearArgs,
}

impl ClearCommand {
    /// Create a new clear command.
    pub fn new(state_dir: &Path, args: ClearArgs) -> Self {
        Self {
            state_dir: state_dir.to_path_buf(),
            args,
        }
    }
}

impl Command for ClearCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let mut store =
            RecoverySessionStore::with_persistence(SessionFile::in_dir(&self.state_dir));

        if self.args.all {
            if store.is_empty() {
                console.message("No recovery sessions to clear.");
                return Ok(CommandResult::success());
            }

            let ids: Vec<RecoverySessionId> = store
                .sessions()
                .into_iter()
                .map(|s| s.session_id.clone())
                .collect();
            let count = ids.len();
            for id in ids {
                store.cleanup_session(&id);
            }

            let label = if count == 1 { "session" } else { "sessions" };
            console.success(&format!("Stopped tracking {} {}.", count, label));
            return Ok(CommandResult::success());
        }

        let Some(raw_id) = &self.args.session_id else {
            console.error("Provide a session id or --all.");
            return Ok(CommandResult::failure(2));
        };

        let Some(session_id) = RecoverySessionId::parse(raw_id) else {
            console.error(&format!("'{}' is not a valid session id", raw_id));
            return Ok(CommandResult::failure(1));
        };

        let Some(session) = store.session_by_id(&session_id) else {
            console.error(&format!("No tracked session with id {}", session_id));
            return Ok(CommandResult::failure(1));
        };

        let label = format!("{} {}", session.entity_kind, session.entity_id);
        store.cleanup_session(&session_id);
        console.success(&format!("Stopped tracking recovery for {}.", label));
        Ok(CommandResult::success())
    }
}
