//! Status command implementation.
//!
//! The `tubevault status` command lists the recovery sessions the store
//! is tracking. After a restart only active, non-stale sessions survive
//! hydration, so this is effectively the "what is still running" view.

use std::path::{Path, PathBuf};

use crate::cli::args::StatusArgs;
use crate::error::Result;
use crate::session::{RecoveryPhase, RecoverySession, RecoverySessionStore, SessionFile};
use crate::ui::{format_relative_time, Console};

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand {
    state_dir: PathBuf,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(state_dir: &Path, args: StatusArgs) -> Self {
        Self {
            state_dir: state_dir.to_path_buf(),
            args,
        }
    }

    fn badge(phase: RecoveryPhase) -> &'static str {
        match phase {
            RecoveryPhase::Pending => "[..]",
            RecoveryPhase::InProgress => "[>>]",
            RecoveryPhase::Completed => "[ok]",
            RecoveryPhase::Failed => "[FAIL]",
            RecoveryPhase::Cancelled => "[--]",
        }
    }

    fn format_session_line(session: &RecoverySession) -> String {
        let name = session
            .entity_title
            .as_deref()
            .unwrap_or(&session.entity_id);
        format!(
            "{} {} {} - {}, started {} ({})",
            Self::badge(session.phase),
            session.entity_kind,
            name,
            session.phase,
            format_relative_time(session.started_at),
            session.session_id
        )
    }

    fn show_wide_detail(console: &Console, session: &RecoverySession) {
        if let Some(filter) = &session.filter {
            let start = filter
                .start_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "*".to_string());
            let end = filter
                .end_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "*".to_string());
            console.message(&format!("    Window: {}..{}", start, end));
        }
        if let Some(error) = &session.error {
            console.message(&format!("    Error: {}", error));
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let store = RecoverySessionStore::with_persistence(SessionFile::in_dir(&self.state_dir));

        if store.is_empty() {
            console.message("No recovery sessions are being tracked.");
            return Ok(CommandResult::success());
        }

        console.header("Recovery Sessions");
        for session in store.sessions() {
            console.message(&Self::format_session_line(session));
            if self.args.wide {
                Self::show_wide_detail(console, session);
            }
        }

        if store.has_active_recovery() {
            console.hint("Use `tubevault cancel <SESSION_ID>` to stop tracking one.");
        }

        Ok(CommandResult::success())
    }
}
