//! Recovery session id generation and parsing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique recovery session identifier.
///
/// Format: `rcv_{timestamp_ms}_{random_hex}`
///
/// Every [`start_recovery`](crate::session::RecoverySessionStore::start_recovery)
/// call mints a fresh id, even for an entity that already has a session.
/// Callbacks that hold an id from a superseded session therefore stop
/// matching anything in the store, which is what keeps late results from
/// overwriting the replacement session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecoverySessionId {
    timestamp: DateTime<Utc>,
    random: [u8; 8],
}

impl RecoverySessionId {
    /// Generate a new session id.
    pub fn new() -> Self {
        let mut random = [0u8; 8];
        getrandom::getrandom(&mut random).expect("Failed to generate random bytes");

        // Truncate to milliseconds for consistent serialization
        let now = Utc::now();
        let timestamp = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);

        Self { timestamp, random }
    }

    /// When the id was minted.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Parse a session id from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("rcv_")?;
        let (millis, random_hex) = rest.split_once('_')?;

        let ts_millis: i64 = millis.parse().ok()?;
        let timestamp = DateTime::from_timestamp_millis(ts_millis)?;
        let random_bytes = hex::decode(random_hex).ok()?;

        let random: [u8; 8] = random_bytes.try_into().ok()?;
        Some(Self { timestamp, random })
    }
}

impl Default for RecoverySessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecoverySessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rcv_{}_{}",
            self.timestamp.timestamp_millis(),
            hex::encode(self.random)
        )
    }
}

// Custom serialization to store as string
impl Serialize for RecoverySessionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RecoverySessionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RecoverySessionId::parse(&s)
            .ok_or_else(|| serde::de::Error::custom("Invalid recovery session id format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_generation() {
        let id1 = RecoverySessionId::new();
        let id2 = RecoverySessionId::new();

        assert_ne!(id1, id2);
        assert!(id1.to_string().starts_with("rcv_"));
    }

    #[test]
    fn session_id_round_trips_through_string() {
        let id = RecoverySessionId::new();
        let parsed = RecoverySessionId::parse(&id.to_string()).unwrap();

        assert_eq!(id, parsed);
    }

    #[test]
    fn session_id_timestamp_is_recent() {
        let id = RecoverySessionId::new();
        let ts = id.timestamp();

        let now = chrono::Utc::now();
        assert!(now.signed_duration_since(ts).num_seconds() < 2);
    }

    #[test]
    fn session_id_display_format() {
        let id = RecoverySessionId::new();
        let display = id.to_string();

        let (millis, random_hex) = display.strip_prefix("rcv_").unwrap().split_once('_').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        // 8 random bytes encode to 16 hex chars
        assert_eq!(random_hex.len(), 16);
    }

    #[test]
    fn session_id_serialization() {
        let id = RecoverySessionId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: RecoverySessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn session_id_parse_invalid() {
        assert!(RecoverySessionId::parse("invalid").is_none());
        assert!(RecoverySessionId::parse("rcv_").is_none());
        assert!(RecoverySessionId::parse("rcv_123").is_none());
        assert!(RecoverySessionId::parse("rcv_abc_xyz").is_none());
        assert!(RecoverySessionId::parse("sess_123_0011223344556677").is_none());
    }

    #[test]
    fn session_id_parse_rejects_short_random() {
        assert!(RecoverySessionId::parse("rcv_123_001122").is_none());
    }
}
