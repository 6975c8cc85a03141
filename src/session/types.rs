//! Recovery session data types.
//!
//! A [`RecoverySession`] tracks one attempt to recover metadata for one
//! unavailable entity. The in-memory record carries a live
//! [`CancellationToken`]; the serializable view is the explicit
//! [`PersistedSession`] projection, which drops it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TubevaultError;
use crate::recovery::RecoveryOutcome;

use super::{CancellationToken, RecoverySessionId};

/// Kind of entity a recovery targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Video,
    Channel,
}

impl EntityKind {
    /// URL path segment used by the recovery endpoint.
    pub fn path_segment(&self) -> &'static str {
        match self {
            EntityKind::Video => "videos",
            EntityKind::Channel => "channels",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Video => write!(f, "video"),
            EntityKind::Channel => write!(f, "channel"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = TubevaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(EntityKind::Video),
            "channel" => Ok(EntityKind::Channel),
            other => Err(TubevaultError::UnknownEntityKind {
                value: other.to_string(),
            }),
        }
    }
}

/// Lifecycle phase of a recovery session.
///
/// ```text
/// pending --------> in-progress --------> completed
///    |                   |          \---> failed
///    |                   |           \--> cancelled
///    \-------------------/  (direct pending -> cancelled also legal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryPhase {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl RecoveryPhase {
    /// Terminal phases admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecoveryPhase::Completed | RecoveryPhase::Failed | RecoveryPhase::Cancelled
        )
    }

    /// Active phases are the ones worth persisting across a restart.
    pub fn is_active(&self) -> bool {
        matches!(self, RecoveryPhase::Pending | RecoveryPhase::InProgress)
    }
}

impl fmt::Display for RecoveryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecoveryPhase::Pending => "pending",
            RecoveryPhase::InProgress => "in-progress",
            RecoveryPhase::Completed => "completed",
            RecoveryPhase::Failed => "failed",
            RecoveryPhase::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

/// Optional year window narrowing the archive search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryFilter {
    /// Earliest snapshot year to consider; unbounded when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_year: Option<i32>,
    /// Latest snapshot year to consider; unbounded when absent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_year: Option<i32>,
}

impl RecoveryFilter {
    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start_year.is_none() && self.end_year.is_none()
    }
}

/// One tracked attempt to recover metadata for one unavailable entity.
///
/// The full in-memory record. Not serializable on purpose: persistence
/// goes through [`RecoverySession::to_persisted`].
#[derive(Debug, Clone)]
pub struct RecoverySession {
    /// Fresh on every start, never reused.
    pub session_id: RecoverySessionId,
    /// Identifier of the video or channel being recovered.
    pub entity_id: String,
    pub entity_kind: EntityKind,
    /// Optional display name.
    pub entity_title: Option<String>,
    pub phase: RecoveryPhase,
    /// Set at creation, immutable thereafter.
    pub started_at: DateTime<Utc>,
    /// None until the session reaches a terminal phase, then fixed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Copied verbatim from the start call.
    pub filter: Option<RecoveryFilter>,
    /// Structured outcome once known.
    pub outcome: Option<RecoveryOutcome>,
    /// Transport-level failure message, if any.
    pub error: Option<String>,
    /// Live handle for aborting the wait; never persisted.
    pub cancellation_token: Option<CancellationToken>,
}

impl RecoverySession {
    /// Create a new session in the `pending` phase.
    pub fn new(
        session_id: RecoverySessionId,
        entity_id: impl Into<String>,
        entity_kind: EntityKind,
        entity_title: Option<String>,
        filter: Option<RecoveryFilter>,
    ) -> Self {
        Self {
            session_id,
            entity_id: entity_id.into(),
            entity_kind,
            entity_title,
            phase: RecoveryPhase::Pending,
            started_at: Utc::now(),
            completed_at: None,
            filter,
            outcome: None,
            error: None,
            cancellation_token: None,
        }
    }

    /// Whether the session is still pending or in progress.
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    /// Move to a new phase.
    ///
    /// The first terminal transition stamps `completed_at`; repeating a
    /// terminal transition leaves the stamp untouched.
    pub fn transition(&mut self, phase: RecoveryPhase) {
        self.phase = phase;
        if phase.is_terminal() && self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
    }

    /// Time spent on this session so far (or total, once terminal).
    pub fn elapsed(&self) -> chrono::Duration {
        let end = self.completed_at.unwrap_or_else(Utc::now);
        end.signed_duration_since(self.started_at)
    }

    /// Project to the serializable view, dropping the cancellation token.
    pub fn to_persisted(&self) -> PersistedSession {
        PersistedSession {
            session_id: self.session_id.clone(),
            entity_id: self.entity_id.clone(),
            entity_kind: self.entity_kind,
            entity_title: self.entity_title.clone(),
            phase: self.phase,
            started_at: self.started_at,
            completed_at: self.completed_at,
            filter: self.filter,
            outcome: self.outcome.clone(),
            error: self.error.clone(),
        }
    }
}

/// Serializable view of a [`RecoverySession`].
///
/// Everything except the cancellation token, which cannot survive a
/// restart: the in-flight request it belonged to is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub session_id: RecoverySessionId,
    pub entity_id: String,
    pub entity_kind: EntityKind,
    pub entity_title: Option<String>,
    pub phase: RecoveryPhase,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub filter: Option<RecoveryFilter>,
    pub outcome: Option<RecoveryOutcome>,
    pub error: Option<String>,
}

impl PersistedSession {
    /// Rehydrate into the in-memory record. The token slot comes back
    /// empty; cancelling a rehydrated session only marks it cancelled.
    pub fn into_session(self) -> RecoverySession {
        RecoverySession {
            session_id: self.session_id,
            entity_id: self.entity_id,
            entity_kind: self.entity_kind,
            entity_title: self.entity_title,
            phase: self.phase,
            started_at: self.started_at,
            completed_at: self.completed_at,
            filter: self.filter,
            outcome: self.outcome,
            error: self.error,
            cancellation_token: None,
        }
    }

    /// Age of the session relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.started_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> RecoverySession {
        RecoverySession::new(
            RecoverySessionId::new(),
            "dQw4w9WgXcQ",
            EntityKind::Video,
            Some("My Video".to_string()),
            Some(RecoveryFilter {
                start_year: None,
                end_year: Some(2024),
            }),
        )
    }

    #[test]
    fn new_session_is_pending() {
        let session = sample_session();

        assert_eq!(session.phase, RecoveryPhase::Pending);
        assert!(session.is_active());
        assert!(session.completed_at.is_none());
        assert!(session.outcome.is_none());
        assert!(session.error.is_none());
        assert!(session.cancellation_token.is_none());
    }

    #[test]
    fn terminal_transition_stamps_completed_at() {
        let mut session = sample_session();
        session.transition(RecoveryPhase::InProgress);
        assert!(session.completed_at.is_none());

        session.transition(RecoveryPhase::Completed);
        assert!(session.completed_at.is_some());
        assert!(!session.is_active());
    }

    #[test]
    fn repeated_terminal_transition_keeps_first_stamp() {
        let mut session = sample_session();
        session.transition(RecoveryPhase::Failed);
        let first = session.completed_at.unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        session.transition(RecoveryPhase::Cancelled);

        assert_eq!(session.completed_at, Some(first));
    }

    #[test]
    fn pending_to_cancelled_is_terminal() {
        let mut session = sample_session();
        session.transition(RecoveryPhase::Cancelled);

        assert_eq!(session.phase, RecoveryPhase::Cancelled);
        assert!(session.completed_at.is_some());
    }

    #[test]
    fn projection_drops_the_token_and_round_trips() {
        let mut session = sample_session();
        session.cancellation_token = Some(CancellationToken::new());

        let persisted = session.to_persisted();
        let json = serde_json::to_string(&persisted).unwrap();
        assert!(!json.contains("cancellation_token"));

        let restored: PersistedSession = serde_json::from_str(&json).unwrap();
        let restored = restored.into_session();
        assert_eq!(restored.session_id, session.session_id);
        assert_eq!(restored.entity_id, "dQw4w9WgXcQ");
        assert!(restored.cancellation_token.is_none());
    }

    #[test]
    fn phase_serializes_kebab_case() {
        let json = serde_json::to_string(&RecoveryPhase::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");

        let parsed: RecoveryPhase = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, RecoveryPhase::Cancelled);
    }

    #[test]
    fn entity_kind_parses_and_displays() {
        assert_eq!("video".parse::<EntityKind>().unwrap(), EntityKind::Video);
        assert_eq!(
            "channel".parse::<EntityKind>().unwrap(),
            EntityKind::Channel
        );
        assert!("playlist".parse::<EntityKind>().is_err());
        assert_eq!(EntityKind::Channel.to_string(), "channel");
        assert_eq!(EntityKind::Video.path_segment(), "videos");
    }

    #[test]
    fn filter_omits_unset_bounds_in_json() {
        let filter = RecoveryFilter {
            start_year: None,
            end_year: Some(2024),
        };
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, "{\"end_year\":2024}");
        assert!(!filter.is_unbounded());
        assert!(RecoveryFilter::default().is_unbounded());
    }

    #[test]
    fn elapsed_is_fixed_after_completion() {
        let mut session = sample_session();
        session.transition(RecoveryPhase::Completed);
        let first = session.elapsed();

        std::thread::sleep(std::time::Duration::from_millis(10));
        assert_eq!(session.elapsed(), first);
    }
}
