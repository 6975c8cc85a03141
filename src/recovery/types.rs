//! Wire types for the recovery endpoint.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured outcome of a recovery attempt, as returned by the endpoint.
///
/// A response with `success = false` is still a completed recovery: the
/// archive was searched and came up empty or unusable. Transport-level
/// failures never produce an outcome at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryOutcome {
    pub success: bool,
    /// Archive snapshot identifier the metadata was taken from.
    pub snapshot_used: Option<String>,
    #[serde(default)]
    pub fields_recovered: Vec<String>,
    #[serde(default)]
    pub fields_skipped: Vec<String>,
    #[serde(default)]
    pub snapshots_available: u32,
    #[serde(default)]
    pub snapshots_tried: u32,
    pub failure_reason: Option<FailureReason>,
    #[serde(default)]
    pub duration_seconds: f64,
}

/// Why a recovery came back unsuccessful.
///
/// The endpoint sends a string code. Known codes get a variant; anything
/// else is carried through verbatim so a newer server does not break an
/// older client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NoSnapshotsFound,
    AllSnapshotsFailed,
    CdxConnectionError,
    Other(String),
}

impl FailureReason {
    /// Parse a wire code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "no_snapshots_found" => FailureReason::NoSnapshotsFound,
            "all_snapshots_failed" => FailureReason::AllSnapshotsFailed,
            "cdx_connection_error" => FailureReason::CdxConnectionError,
            other => FailureReason::Other(other.to_string()),
        }
    }

    /// The wire code this reason serializes as.
    pub fn as_code(&self) -> &str {
        match self {
            FailureReason::NoSnapshotsFound => "no_snapshots_found",
            FailureReason::AllSnapshotsFailed => "all_snapshots_failed",
            FailureReason::CdxConnectionError => "cdx_connection_error",
            FailureReason::Other(code) => code,
        }
    }

    /// Human-readable explanation for terminal output.
    pub fn describe(&self) -> String {
        match self {
            FailureReason::NoSnapshotsFound => {
                "The web archive has no snapshots of this entity".to_string()
            }
            FailureReason::AllSnapshotsFailed => {
                "Every archived snapshot failed to yield usable metadata".to_string()
            }
            FailureReason::CdxConnectionError => {
                "The archive's snapshot index could not be reached".to_string()
            }
            FailureReason::Other(code) => format!("Recovery failed ({})", code),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl Serialize for FailureReason {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_code())
    }
}

impl<'de> Deserialize<'de> for FailureReason {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Ok(FailureReason::from_code(&code))
    }
}
