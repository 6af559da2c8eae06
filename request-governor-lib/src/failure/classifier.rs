use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::input::Failure;
use super::kind::ErrorKind;
use super::messages;
use crate::session::{AlwaysOnline, Connectivity};

const FETCH_FAILED_MARKER: &str = "Failed to fetch";
const TIMEOUT_MARKER: &str = "timeout";

/// Outcome of classifying a [`Failure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorClassification {
    pub kind: ErrorKind,
    /// Message to present to the user
    pub message: String,
    /// HTTP status of the original failure, if it had one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorClassification {
    fn fixed(kind: ErrorKind, status: Option<u16>) -> Self {
        Self { kind, message: kind.user_message().to_string(), status }
    }

    fn unknown(message: Option<&str>, status: Option<u16>) -> Self {
        Self {
            kind: ErrorKind::UnknownError,
            message: message.unwrap_or(messages::UNKNOWN_ERROR).to_string(),
            status,
        }
    }
}

impl fmt::Display for ErrorClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ErrorClassification {}

/// Classify `failure`, consulting `connectivity` first.
///
/// Total: every input yields a classification.
///
/// # Logic
/// - offline: always `NETWORK_ERROR`
/// - a carried HTTP status: the status table, or the failure's own message
/// - an error value: "Failed to fetch" and "timeout" markers, else its message
/// - bare text: verbatim
/// - an object: its message
/// - otherwise: the generic unknown message
pub fn classify_error(failure: &Failure, connectivity: &dyn Connectivity) -> ErrorClassification {
    let status = failure.status();

    if !connectivity.is_online() {
        return ErrorClassification::fixed(ErrorKind::NetworkError, status);
    }

    if let Some(status) = status {
        return match ErrorKind::from_status(status) {
            Some(kind) => ErrorClassification::fixed(kind, Some(status)),
            None => ErrorClassification::unknown(failure.message(), Some(status)),
        };
    }

    match failure {
        Failure::Error { message, .. } => {
            if message.contains(FETCH_FAILED_MARKER) {
                ErrorClassification::fixed(ErrorKind::NetworkError, None)
            } else if message.contains(TIMEOUT_MARKER) {
                ErrorClassification::fixed(ErrorKind::Timeout, None)
            } else {
                ErrorClassification::unknown(failure.message(), None)
            }
        }
        Failure::Text(message) => ErrorClassification {
            kind: ErrorKind::UnknownError,
            message: message.clone(),
            status: None,
        },
        Failure::Object { .. } | Failure::Response { .. } | Failure::Unknown => {
            ErrorClassification::unknown(failure.message(), None)
        }
    }
}

/// Error classifier bound to a connectivity signal.
#[derive(Clone)]
pub struct Classifier {
    connectivity: Arc<dyn Connectivity>,
}

impl Classifier {
    pub fn new(connectivity: Arc<dyn Connectivity>) -> Self {
        Self { connectivity }
    }

    /// Classifier that assumes the network is always reachable.
    pub fn always_online() -> Self {
        Self::new(Arc::new(AlwaysOnline))
    }

    pub fn classify(&self, failure: &Failure) -> ErrorClassification {
        classify_error(failure, self.connectivity.as_ref())
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::always_online()
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("online", &self.connectivity.is_online())
            .finish()
    }
}
