//! Client for the archive recovery endpoint.
//!
//! The actual archive lookup runs server-side in the sync service; this
//! module only speaks its request/response contract:
//!
//! `POST /{videos|channels}/{entity_id}/recover?start_year=Y&end_year=Y`
//!
//! with either year omitted when unbounded, answered by a
//! [`RecoveryOutcome`] payload.

mod client;
mod types;

pub use client::{RecoveryClient, RecoveryHandle, DEFAULT_TIMEOUT};
pub use types::{FailureReason, RecoveryOutcome};
