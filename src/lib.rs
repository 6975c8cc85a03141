//! tubevault - Recovery engine for a personal YouTube archive.
//!
//! When a synced video or channel becomes unavailable (deleted, private,
//! terminated), tubevault asks the local sync service to recover its
//! metadata from a web archive and tracks each long-running attempt as a
//! recovery session: cancellable, observable, and persisted so an
//! in-flight operation is not forgotten across a restart.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`recovery`] - Client for the archive recovery endpoint
//! - [`session`] - Recovery session state machine, store, and persistence
//! - [`ui`] - Terminal output, spinner, and formatting helpers
//!
//! # Example
//!
//! ```
//! use tubevault::session::{EntityKind, RecoveryPhase, RecoverySessionStore};
//!
//! let mut store = RecoverySessionStore::in_memory();
//! let session_id = store.start_recovery("dQw4w9WgXcQ", EntityKind::Video, None, None);
//! store.update_phase(&session_id, RecoveryPhase::InProgress);
//! assert!(store.has_active_recovery());
//! ```

pub mod cli;
pub mod error;
pub mod recovery;
pub mod session;
pub mod ui;

pub use error::{Result, TubevaultError};
