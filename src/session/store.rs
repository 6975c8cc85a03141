//! The recovery session store.
//!
//! Single source of truth for all recovery sessions. Every read and write
//! goes through [`RecoverySessionStore`] so that subscribers and the
//! persisted snapshot stay consistent; no collaborator mutates a session
//! in place.

use std::collections::HashMap;

use crate::recovery::RecoveryOutcome;

use super::persist::SessionFile;
use super::{
    CancellationToken, EntityKind, RecoveryFilter, RecoveryPhase, RecoverySession,
    RecoverySessionId,
};

/// Handle returned by [`RecoverySessionStore::subscribe`].
pub type ListenerId = usize;

type Listener = Box<dyn Fn(&RecoverySession) + Send>;

/// In-memory authoritative state for recovery sessions.
///
/// The collection maps `entity_id` to its most recent session: at most
/// one session per entity, with [`start_recovery`](Self::start_recovery)
/// silently replacing any prior entry. All phase-mutating operations
/// resolve their target by `session_id`, never by map key, so a stale
/// callback from a superseded session matches nothing and becomes a
/// no-op instead of corrupting the replacement.
pub struct RecoverySessionStore {
    sessions: HashMap<String, RecoverySession>,
    persistence: Option<SessionFile>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: ListenerId,
}

impl RecoverySessionStore {
    /// Create an ephemeral store with no persistence.
    pub fn in_memory() -> Self {
        Self {
            sessions: HashMap::new(),
            persistence: None,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Create a store backed by `file`, hydrating surviving sessions.
    ///
    /// Hydration runs once, here: stale sessions are discarded and the
    /// rest come back without cancellation tokens (the requests they
    /// belonged to did not survive the restart).
    pub fn with_persistence(file: SessionFile) -> Self {
        let sessions = file.hydrate();
        if !sessions.is_empty() {
            tracing::debug!(count = sessions.len(), "rehydrated recovery sessions");
        }
        Self {
            sessions,
            persistence: Some(file),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    // --- Mutations ---

    /// Start tracking a new recovery attempt for `entity_id`.
    ///
    /// Always succeeds and returns the fresh session id. Any prior
    /// session for the entity is replaced; its cancellation token is
    /// deliberately left untripped, so a superseded request runs to
    /// completion and its late result dies against the session-id scan.
    pub fn start_recovery(
        &mut self,
        entity_id: &str,
        entity_kind: EntityKind,
        entity_title: Option<String>,
        filter: Option<RecoveryFilter>,
    ) -> RecoverySessionId {
        let session_id = RecoverySessionId::new();
        let session = RecoverySession::new(
            session_id.clone(),
            entity_id,
            entity_kind,
            entity_title,
            filter,
        );

        if let Some(previous) = self.sessions.insert(entity_id.to_string(), session) {
            tracing::debug!(
                entity = %entity_id,
                superseded = %previous.session_id,
                "replaced existing recovery session"
            );
        }
        tracing::debug!(entity = %entity_id, session = %session_id, "recovery session started");

        self.committed(entity_id);
        session_id
    }

    /// Move the matching session to `phase`. No-op for unknown ids.
    pub fn update_phase(&mut self, session_id: &RecoverySessionId, phase: RecoveryPhase) {
        let Some(entity_id) = self.entity_for(session_id) else {
            return;
        };
        if let Some(session) = self.sessions.get_mut(&entity_id) {
            session.transition(phase);
        }
        self.committed(&entity_id);
    }

    /// Record a structured outcome and complete the session.
    ///
    /// Unsuccessful outcomes land here too: a recovery that searched the
    /// archive and found nothing is `completed`, not `failed`.
    pub fn set_result(&mut self, session_id: &RecoverySessionId, outcome: RecoveryOutcome) {
        let Some(entity_id) = self.entity_for(session_id) else {
            return;
        };
        if let Some(session) = self.sessions.get_mut(&entity_id) {
            session.outcome = Some(outcome);
            session.transition(RecoveryPhase::Completed);
        }
        self.committed(&entity_id);
    }

    /// Record a transport-level failure and fail the session.
    pub fn set_error(&mut self, session_id: &RecoverySessionId, message: impl Into<String>) {
        let Some(entity_id) = self.entity_for(session_id) else {
            return;
        };
        if let Some(session) = self.sessions.get_mut(&entity_id) {
            session.error = Some(message.into());
            session.transition(RecoveryPhase::Failed);
        }
        self.committed(&entity_id);
    }

    /// Attach a cancellation token for later use by
    /// [`cancel_recovery`](Self::cancel_recovery). No-op for unknown ids.
    pub fn attach_cancellation(&mut self, session_id: &RecoverySessionId, token: CancellationToken) {
        let Some(entity_id) = self.entity_for(session_id) else {
            return;
        };
        if let Some(session) = self.sessions.get_mut(&entity_id) {
            session.cancellation_token = Some(token);
        }
        self.committed(&entity_id);
    }

    /// Cancel the matching session.
    ///
    /// Trips the attached token, if any (safe to call when none was ever
    /// attached), then marks the session `cancelled`. The token is
    /// detached as it fires, so a session's own cancellation triggers at
    /// most once no matter how often this is called.
    pub fn cancel_recovery(&mut self, session_id: &RecoverySessionId) {
        let Some(entity_id) = self.entity_for(session_id) else {
            return;
        };
        if let Some(session) = self.sessions.get_mut(&entity_id) {
            if let Some(token) = session.cancellation_token.take() {
                token.cancel();
            }
            session.transition(RecoveryPhase::Cancelled);
            tracing::debug!(entity = %entity_id, session = %session_id, "recovery cancelled");
        }
        self.committed(&entity_id);
    }

    /// Stop tracking the matching session entirely. No-op for unknown ids.
    pub fn cleanup_session(&mut self, session_id: &RecoverySessionId) {
        let Some(entity_id) = self.entity_for(session_id) else {
            return;
        };
        if let Some(removed) = self.sessions.remove(&entity_id) {
            self.persist();
            self.notify(&removed);
        }
    }

    // --- Queries ---

    /// The session currently tracked for `entity_id`, in any phase, so a
    /// caller can show the last result after completion.
    pub fn session_for(&self, entity_id: &str) -> Option<&RecoverySession> {
        self.sessions.get(entity_id)
    }

    /// Look up a session by id (the same linear scan the mutations use).
    pub fn session_by_id(&self, session_id: &RecoverySessionId) -> Option<&RecoverySession> {
        self.sessions
            .values()
            .find(|s| s.session_id == *session_id)
    }

    /// All sessions still pending or in progress.
    pub fn active_sessions(&self) -> Vec<&RecoverySession> {
        let mut active: Vec<&RecoverySession> =
            self.sessions.values().filter(|s| s.is_active()).collect();
        active.sort_by_key(|s| s.started_at);
        active
    }

    /// All tracked sessions, oldest first.
    pub fn sessions(&self) -> Vec<&RecoverySession> {
        let mut all: Vec<&RecoverySession> = self.sessions.values().collect();
        all.sort_by_key(|s| s.started_at);
        all
    }

    /// Whether any session is pending or in progress.
    pub fn has_active_recovery(&self) -> bool {
        self.sessions.values().any(|s| s.is_active())
    }

    /// Number of tracked sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store tracks no sessions at all.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    // --- Subscriptions ---

    /// Register a callback invoked synchronously with the affected
    /// session after every effective mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&RecoverySession) + Send + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    // --- Internals ---

    /// Resolve a session id to its entity key.
    ///
    /// Shared by every session-id-keyed operation: match on the session's
    /// own id, not the map key, so ids from superseded sessions resolve
    /// to nothing. Linear scan; the collection holds a handful of
    /// entries at most.
    fn entity_for(&self, session_id: &RecoverySessionId) -> Option<String> {
        self.sessions
            .values()
            .find(|s| s.session_id == *session_id)
            .map(|s| s.entity_id.clone())
    }

    /// Re-persist and notify after a mutation landed on `entity_id`.
    fn committed(&self, entity_id: &str) {
        self.persist();
        if let Some(session) = self.sessions.get(entity_id) {
            self.notify(session);
        }
    }

    fn persist(&self) {
        if let Some(file) = &self.persistence {
            file.save(&self.sessions);
        }
    }

    fn notify(&self, session: &RecoverySession) {
        for (_, listener) in &self.listeners {
            listener(session);
        }
    }
}
