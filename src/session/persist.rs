//! Session persistence codec.
//!
//! Active recovery sessions survive a restart so the user does not lose
//! track of an in-flight operation. Terminal sessions are noise and are
//! never written; cancellation tokens cannot be serialized and are
//! stripped by the [`PersistedSession`] projection before writing.
//!
//! Persistence is a convenience, not a correctness requirement: every
//! read or write fault degrades to "no persisted state" / "write
//! skipped" and never reaches the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{PersistedSession, RecoverySession};

/// File name of the session snapshot inside the state directory.
pub const FILE_NAME: &str = "recovery_sessions.json";

/// Sessions older than this at hydration time are assumed abandoned
/// (the process died or the request was orphaned) and are not resurrected.
const STALE_THRESHOLD_SECS: i64 = 10 * 60;

/// On-disk snapshot shape: a versioned list of `[entity_id, session]`
/// pairs, only ever containing active sessions.
#[derive(Debug, Serialize, Deserialize)]
struct SessionSnapshot {
    version: u32,
    sessions: Vec<(String, PersistedSession)>,
}

impl SessionSnapshot {
    const CURRENT_VERSION: u32 = 1;

    fn capture(sessions: &HashMap<String, RecoverySession>) -> Self {
        let mut sessions: Vec<(String, PersistedSession)> = sessions
            .iter()
            .filter(|(_, session)| session.is_active())
            .map(|(entity_id, session)| (entity_id.clone(), session.to_persisted()))
            .collect();
        // Deterministic file contents
        sessions.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            version: Self::CURRENT_VERSION,
            sessions,
        }
    }
}

/// Durable storage for the session collection.
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    /// Create a session file at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the session file at its conventional name inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(FILE_NAME))
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the active subset of `sessions` to disk.
    ///
    /// Faults are logged and swallowed; a failed write must never block
    /// a recovery operation from proceeding in memory.
    pub fn save(&self, sessions: &HashMap<String, RecoverySession>) {
        let snapshot = SessionSnapshot::capture(sessions);
        if let Err(e) = self.write_snapshot(&snapshot) {
            tracing::warn!(path = %self.path.display(), error = %e, "skipping session persistence");
        }
    }

    /// Read surviving sessions back, keyed by entity id.
    ///
    /// Runs once at store construction. Faults degrade to an empty
    /// collection.
    pub fn hydrate(&self) -> HashMap<String, RecoverySession> {
        self.hydrate_at(Utc::now())
    }

    /// Hydration with an explicit clock, for deterministic staleness
    /// checks.
    ///
    /// A persisted session strictly older than the 10-minute staleness
    /// threshold is discarded; one exactly at the boundary is kept.
    /// Survivors come back with no cancellation token.
    pub fn hydrate_at(&self, now: DateTime<Utc>) -> HashMap<String, RecoverySession> {
        let snapshot = match self.read_snapshot() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable session snapshot");
                return HashMap::new();
            }
        };

        let mut sessions = HashMap::new();
        for (entity_id, persisted) in snapshot.sessions {
            if !persisted.phase.is_active() {
                continue;
            }
            if persisted.age(now).num_seconds() > STALE_THRESHOLD_SECS {
                tracing::debug!(
                    entity = %entity_id,
                    session = %persisted.session_id,
                    "dropping stale persisted session"
                );
                continue;
            }
            sessions.insert(entity_id, persisted.into_session());
        }
        sessions
    }

    fn write_snapshot(&self, snapshot: &SessionSnapshot) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;

        // Atomic write: write to temp file, then rename, so a crash
        // mid-write never leaves a truncated snapshot behind.
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    fn read_snapshot(&self) -> anyhow::Result<Option<SessionSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        let snapshot: SessionSnapshot = serde_json::from_str(&json)?;
        Ok(Some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{
        CancellationToken, EntityKind, RecoveryPhase, RecoverySessionId,
    };
    use tempfile::TempDir;

    fn session(entity_id: &str, phase: RecoveryPhase) -> RecoverySession {
        let mut session = RecoverySession::new(
            RecoverySessionId::new(),
            entity_id,
            EntityKind::Video,
            None,
            None,
        );
        session.transition(phase);
        session
    }

    fn collection(sessions: Vec<RecoverySession>) -> HashMap<String, RecoverySession> {
        sessions
            .into_iter()
            .map(|s| (s.entity_id.clone(), s))
            .collect()
    }

    #[test]
    fn save_writes_only_active_sessions() {
        let temp = TempDir::new().unwrap();
        let file = SessionFile::in_dir(temp.path());

        file.save(&collection(vec![
            session("pending", RecoveryPhase::Pending),
            session("running", RecoveryPhase::InProgress),
            session("done", RecoveryPhase::Completed),
            session("broken", RecoveryPhase::Failed),
            session("stopped", RecoveryPhase::Cancelled),
        ]));

        let hydrated = file.hydrate();
        let mut entities: Vec<&str> = hydrated.keys().map(String::as_str).collect();
        entities.sort_unstable();
        assert_eq!(entities, vec!["pending", "running"]);
    }

    #[test]
    fn save_never_serializes_the_token() {
        let temp = TempDir::new().unwrap();
        let file = SessionFile::in_dir(temp.path());

        let mut active = session("v1", RecoveryPhase::InProgress);
        active.cancellation_token = Some(CancellationToken::new());
        file.save(&collection(vec![active]));

        let raw = fs::read_to_string(file.path()).unwrap();
        assert!(!raw.contains("cancellation_token"));
        assert!(raw.contains("\"v1\""));
    }

    #[test]
    fn hydrated_sessions_carry_no_token() {
        let temp = TempDir::new().unwrap();
        let file = SessionFile::in_dir(temp.path());

        let mut active = session("v1", RecoveryPhase::Pending);
        active.cancellation_token = Some(CancellationToken::new());
        file.save(&collection(vec![active]));

        let hydrated = file.hydrate();
        assert!(hydrated["v1"].cancellation_token.is_none());
    }

    #[test]
    fn stale_sessions_are_dropped_at_the_strict_boundary() {
        let temp = TempDir::new().unwrap();
        let file = SessionFile::in_dir(temp.path());

        let mut at_boundary = session("boundary", RecoveryPhase::Pending);
        let mut beyond = session("beyond", RecoveryPhase::Pending);
        let now = Utc::now();
        at_boundary.started_at = now - chrono::Duration::seconds(STALE_THRESHOLD_SECS);
        beyond.started_at = now - chrono::Duration::seconds(STALE_THRESHOLD_SECS + 1);
        file.save(&collection(vec![at_boundary, beyond]));

        let hydrated = file.hydrate_at(now);
        assert!(hydrated.contains_key("boundary"));
        assert!(!hydrated.contains_key("beyond"));
    }

    #[test]
    fn fresh_sessions_survive_hydration() {
        let temp = TempDir::new().unwrap();
        let file = SessionFile::in_dir(temp.path());

        let s = session("v1", RecoveryPhase::InProgress);
        let id = s.session_id.clone();
        file.save(&collection(vec![s]));

        let hydrated = file.hydrate();
        assert_eq!(hydrated["v1"].session_id, id);
        assert_eq!(hydrated["v1"].phase, RecoveryPhase::InProgress);
    }

    #[test]
    fn missing_file_hydrates_empty() {
        let temp = TempDir::new().unwrap();
        let file = SessionFile::in_dir(temp.path().join("nope"));

        assert!(file.hydrate().is_empty());
    }

    #[test]
    fn corrupt_file_hydrates_empty() {
        let temp = TempDir::new().unwrap();
        let file = SessionFile::in_dir(temp.path());
        fs::write(file.path(), "{ not json").unwrap();

        assert!(file.hydrate().is_empty());
    }

    #[test]
    fn save_to_unwritable_path_is_swallowed() {
        // A directory where the snapshot file should be: the write fails,
        // the call must not panic.
        let temp = TempDir::new().unwrap();
        let file = SessionFile::new(temp.path());

        file.save(&collection(vec![session("v1", RecoveryPhase::Pending)]));
    }

    #[test]
    fn save_uses_atomic_write() {
        let temp = TempDir::new().unwrap();
        let file = SessionFile::in_dir(temp.path());

        file.save(&collection(vec![session("v1", RecoveryPhase::Pending)]));

        let temp_path = file.path().with_extension("json.tmp");
        assert!(!temp_path.exists());
        assert!(file.path().exists());
    }

    #[test]
    fn snapshot_is_versioned_and_pairs_shaped() {
        let temp = TempDir::new().unwrap();
        let file = SessionFile::in_dir(temp.path());

        file.save(&collection(vec![session("v1", RecoveryPhase::Pending)]));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        let pair = &raw["sessions"][0];
        assert_eq!(pair[0], "v1");
        assert_eq!(pair[1]["phase"], "pending");
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let temp = TempDir::new().unwrap();
        let file = SessionFile::in_dir(temp.path());

        file.save(&collection(vec![session("v1", RecoveryPhase::Pending)]));
        file.save(&collection(vec![session("v2", RecoveryPhase::Pending)]));

        let hydrated = file.hydrate();
        assert!(!hydrated.contains_key("v1"));
        assert!(hydrated.contains_key("v2"));
    }
}
