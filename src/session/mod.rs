//! Recovery session tracking.
//!
//! This module is the authoritative home of recovery state:
//! - what is being recovered ([`RecoverySession`], [`EntityKind`])
//! - where each attempt stands ([`RecoveryPhase`] state machine)
//! - how callers cancel the wait ([`CancellationToken`])
//! - how in-flight sessions survive a restart ([`SessionFile`])
//!
//! All mutation goes through [`RecoverySessionStore`]; collaborators
//! never edit a session in place.

mod cancel;
mod id;
mod persist;
mod store;
mod types;

pub use cancel::CancellationToken;
pub use id::RecoverySessionId;
pub use persist::{SessionFile, FILE_NAME};
pub use store::{ListenerId, RecoverySessionStore};
pub use types::{EntityKind, PersistedSession, RecoveryFilter, RecoveryPhase, RecoverySession};

/// Get the default state directory.
pub fn default_state_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("tubevault")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_dir_valid() {
        let path = default_state_dir();
        assert!(path.ends_with("tubevault"));
    }
}
