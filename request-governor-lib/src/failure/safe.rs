use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::input::Failure;

/// A failure description that is safe to log or ship to an error tracker:
/// message, status and time only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafeError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

impl SafeError {
    pub fn from_failure(failure: &Failure) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| Duration::from_secs(0))
            .as_millis() as u64;

        Self {
            message: failure.message().unwrap_or("Unknown error").to_string(),
            status: failure.status(),
            timestamp_ms,
        }
    }
}

impl From<&Failure> for SafeError {
    fn from(failure: &Failure) -> Self {
        Self::from_failure(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_message_and_status() {
        let safe = SafeError::from_failure(&Failure::response_with_message(503, "maintenance"));
        assert_eq!(safe.message, "maintenance");
        assert_eq!(safe.status, Some(503));
        assert!(safe.timestamp_ms > 0);
    }

    #[test]
    fn missing_message_defaults() {
        let safe = SafeError::from_failure(&Failure::Unknown);
        assert_eq!(safe.message, "Unknown error");
        assert_eq!(safe.status, None);
    }

    #[test]
    fn serializes_without_absent_status() -> Result<(), serde_json::Error> {
        let safe = SafeError { message: "boom".into(), status: None, timestamp_ms: 1 };
        let json = serde_json::to_value(&safe)?;
        assert_eq!(json, serde_json::json!({"message": "boom", "timestamp_ms": 1}));
        Ok(())
    }
}
