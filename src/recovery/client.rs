//! Recovery endpoint client.
//!
//! Archive searches run server-side and take minutes, not seconds, so the
//! client is built with a long per-request timeout and offers a detached
//! mode ([`RecoveryClient::begin`]) where the blocking call runs on a
//! worker thread and the caller polls a [`RecoveryHandle`]. Dropping the
//! handle stops waiting without aborting the server-side search, which is
//! exactly what session cancellation promises.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;

use crate::error::{Result, TubevaultError};
use crate::session::{EntityKind, RecoveryFilter};

use super::RecoveryOutcome;

/// Default per-request timeout. Archive searches walk snapshot lists one
/// by one, so this is deliberately generous.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Client for the recovery endpoint of the local sync service.
#[derive(Clone)]
pub struct RecoveryClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RecoveryClient {
    /// Create a client with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// URL for a recovery request.
    fn recover_url(&self, kind: EntityKind, entity_id: &str) -> String {
        format!(
            "{}/{}/{}/recover",
            self.base_url.trim_end_matches('/'),
            kind.path_segment(),
            entity_id
        )
    }

    /// Query pairs for the year window; either bound is omitted when unbounded.
    fn query_pairs(filter: Option<&RecoveryFilter>) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = filter {
            if let Some(year) = filter.start_year {
                pairs.push(("start_year", year.to_string()));
            }
            if let Some(year) = filter.end_year {
                pairs.push(("end_year", year.to_string()));
            }
        }
        pairs
    }

    /// Run a recovery request to completion, blocking the calling thread.
    pub fn recover(
        &self,
        kind: EntityKind,
        entity_id: &str,
        filter: Option<&RecoveryFilter>,
    ) -> Result<RecoveryOutcome> {
        let url = self.recover_url(kind, entity_id);
        tracing::debug!(%url, "sending recovery request");

        let response = self
            .client
            .post(&url)
            .query(&Self::query_pairs(filter))
            .send()
            .map_err(|e| TubevaultError::RecoveryRequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TubevaultError::RecoveryRejected {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<RecoveryOutcome>()
            .map_err(|e| TubevaultError::RecoveryResponseInvalid {
                url,
                message: e.to_string(),
            })
    }

    /// Run a recovery request on a detached worker thread.
    ///
    /// The worker owns its own clone of the client; if the caller stops
    /// polling the returned handle, the worker finishes (or times out) on
    /// its own and its result is discarded.
    pub fn begin(
        &self,
        kind: EntityKind,
        entity_id: &str,
        filter: Option<RecoveryFilter>,
    ) -> RecoveryHandle {
        let (tx, rx) = mpsc::channel();
        let client = self.clone();
        let entity_id = entity_id.to_string();

        thread::spawn(move || {
            let result = client.recover(kind, &entity_id, filter.as_ref());
            // Receiver may already be gone if the caller cancelled.
            let _ = tx.send(result);
        });

        RecoveryHandle { rx }
    }
}

/// Receiving end of a detached recovery request.
pub struct RecoveryHandle {
    rx: mpsc::Receiver<Result<RecoveryOutcome>>,
}

impl RecoveryHandle {
    /// Wait up to `wait` for the outcome.
    ///
    /// Returns `None` while the request is still in flight. A worker that
    /// died without reporting surfaces as an error, not a hang.
    pub fn poll(&self, wait: Duration) -> Option<Result<RecoveryOutcome>> {
        match self.rx.recv_timeout(wait) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(TubevaultError::Other(anyhow!(
                "recovery worker exited before delivering a response"
            )))),
        }
    }
}
