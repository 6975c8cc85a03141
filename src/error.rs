//! Error types for tubevault operations.
//!
//! This module defines [`TubevaultError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `TubevaultError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `TubevaultError::Other`) for unexpected errors
//! - Session-store misuse (unknown session ids) and persistence faults are
//!   never errors: the store treats both as silent no-ops

use thiserror::Error;

/// Core error type for tubevault operations.
#[derive(Debug, Error)]
pub enum TubevaultError {
    /// The recovery request could not be sent or the transport failed mid-flight.
    #[error("Recovery request to {url} failed: {message}")]
    RecoveryRequestFailed { url: String, message: String },

    /// The recovery endpoint answered with a non-success status.
    #[error("Recovery endpoint returned HTTP {status} for {url}")]
    RecoveryRejected { url: String, status: u16 },

    /// The recovery endpoint answered, but the payload did not decode.
    #[error("Could not decode recovery response from {url}: {message}")]
    RecoveryResponseInvalid { url: String, message: String },

    /// An entity kind argument was neither `video` nor `channel`.
    #[error("Unknown entity kind '{value}' (expected 'video' or 'channel')")]
    UnknownEntityKind { value: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for tubevault operations.
pub type Result<T> = std::result::Result<T, TubevaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_displays_url_and_message() {
        let err = TubevaultError::RecoveryRequestFailed {
            url: "http://localhost:8970/videos/abc/recover".into(),
            message: "connection refused".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/videos/abc/recover"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn rejected_displays_status() {
        let err = TubevaultError::RecoveryRejected {
            url: "http://localhost:8970/channels/UC123/recover".into(),
            status: 503,
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("UC123"));
    }

    #[test]
    fn response_invalid_displays_message() {
        let err = TubevaultError::RecoveryResponseInvalid {
            url: "http://localhost:8970/videos/abc/recover".into(),
            message: "missing field `success`".into(),
        };
        assert!(err.to_string().contains("missing field `success`"));
    }

    #[test]
    fn unknown_entity_kind_displays_value() {
        let err = TubevaultError::UnknownEntityKind {
            value: "playlist".into(),
        };
        assert!(err.to_string().contains("playlist"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: TubevaultError = io_err.into();
        assert!(matches!(err, TubevaultError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(TubevaultError::UnknownEntityKind {
                value: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
