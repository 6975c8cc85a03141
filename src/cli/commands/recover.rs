//! Recover command implementation.
//!
//! The `tubevault recover` command drives one full recovery session: it
//! creates the session, hands the request to the API client, keeps the
//! user informed while the archive search runs, and records the terminal
//! outcome in the store.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::cli::args::RecoverArgs;
use crate::error::Result;
use crate::recovery::{RecoveryClient, RecoveryOutcome};
use crate::session::{
    CancellationToken, EntityKind, RecoveryFilter, RecoveryPhase, RecoverySessionStore,
    SessionFile,
};
use crate::ui::{format_duration, Console, RecoverySpinner};

use super::dispatcher::{Command, CommandResult};

/// How long each wait on the in-flight request lasts before the loop
/// gets a chance to notice cancellation and refresh the spinner.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The recover command implementation.
pub struct RecoverCommand {
    state_dir: PathBuf,
    api_url: String,
    args: RecoverArgs,
}

impl RecoverCommand {
    /// Create a new recover command.
    pub fn new(state_dir: &Path, api_url: &str, args: RecoverArgs) -> Self {
        Self {
            state_dir: state_dir.to_path_buf(),
            api_url: api_url.to_string(),
            args,
        }
    }

    fn filter(&self) -> Option<RecoveryFilter> {
        let filter = RecoveryFilter {
            start_year: self.args.start_year,
            end_year: self.args.end_year,
        };
        if filter.is_unbounded() {
            None
        } else {
            Some(filter)
        }
    }

    fn report_outcome(&self, console: &Console, outcome: &RecoveryOutcome) -> CommandResult {
        if outcome.success {
            let snapshot = outcome.snapshot_used.as_deref().unwrap_or("unknown");
            console.success(&format!(
                "Recovered {} field(s) from snapshot {}",
                outcome.fields_recovered.len(),
                snapshot
            ));
            if !outcome.fields_recovered.is_empty() {
                console.message(&format!(
                    "  Recovered: {}",
                    outcome.fields_recovered.join(", ")
                ));
            }
            if !outcome.fields_skipped.is_empty() {
                console.message(&format!("  Skipped: {}", outcome.fields_skipped.join(", ")));
            }
            console.detail(&format!(
                "  Tried {} of {} snapshot(s) in {:.1}s",
                outcome.snapshots_tried, outcome.snapshots_available, outcome.duration_seconds
            ));
            CommandResult::success()
        } else {
            let reason = outcome
                .failure_reason
                .as_ref()
                .map(|r| r.describe())
                .unwrap_or_else(|| "Recovery was unsuccessful".to_string());
            console.warning(&reason);
            console.detail(&format!(
                "  Tried {} of {} snapshot(s)",
                outcome.snapshots_tried, outcome.snapshots_available
            ));
            CommandResult::failure(1)
        }
    }
}

impl Command for RecoverCommand {
    fn execute(&self, console: &Console) -> Result<CommandResult> {
        let kind = EntityKind::from_str(&self.args.kind)?;
        let filter = self.filter();

        let mut store =
            RecoverySessionStore::with_persistence(SessionFile::in_dir(&self.state_dir));
        let client = RecoveryClient::new(&self.api_url);

        let label = match &self.args.title {
            Some(title) => format!("{} \"{}\"", kind, title),
            None => format!("{} {}", kind, self.args.entity_id),
        };

        let session_id =
            store.start_recovery(&self.args.entity_id, kind, self.args.title.clone(), filter);
        console.detail(&format!("Session {}", session_id));

        let token = CancellationToken::new();
        store.attach_cancellation(&session_id, token.clone());

        let handle = client.begin(kind, &self.args.entity_id, filter);
        store.update_phase(&session_id, RecoveryPhase::InProgress);

        let spinner = if console.is_quiet() {
            RecoverySpinner::hidden()
        } else {
            RecoverySpinner::new(&format!("Searching the web archive for {}…", label))
        };

        let started = Instant::now();
        let deadline = self.args.timeout.map(Duration::from_secs);

        let outcome = loop {
            if let Some(result) = handle.poll(POLL_INTERVAL) {
                break Some(result);
            }
            if token.is_cancelled() {
                break None;
            }
            if deadline.is_some_and(|limit| started.elapsed() >= limit) {
                store.cancel_recovery(&session_id);
                break None;
            }
            spinner.set_message(format!(
                "Searching the web archive for {}… {}",
                label,
                format_duration(started.elapsed())
            ));
        };

        spinner.clear();
        match outcome {
            Some(Ok(outcome)) => {
                store.set_result(&session_id, outcome.clone());
                Ok(self.report_outcome(console, &outcome))
            }
            Some(Err(e)) => {
                store.set_error(&session_id, e.to_string());
                console.error(&format!("Recovery failed: {}", e));
                Ok(CommandResult::failure(1))
            }
            None => {
                console.warning(&format!(
                    "Recovery cancelled after {}",
                    format_duration(started.elapsed())
                ));
                console.hint(
                    "The archive search may still finish server-side; it is no longer tracked.",
                );
                Ok(CommandResult::failure(1))
            }
        }
    }
}
