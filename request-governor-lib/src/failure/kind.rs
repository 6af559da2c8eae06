use serde::Serialize;
use std::fmt;

use super::messages;

/// Classified failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// HTTP 401
    Unauthorized,
    /// HTTP 403
    Forbidden,
    /// HTTP 404
    NotFound,
    /// HTTP 408, or an upstream timeout signal
    Timeout,
    /// HTTP 422
    ValidationError,
    /// HTTP 500, 502, 503, 504
    ServerError,
    /// Offline, or the request never reached the server
    NetworkError,
    /// Anything else
    UnknownError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::Unauthorized,
        ErrorKind::Forbidden,
        ErrorKind::NotFound,
        ErrorKind::Timeout,
        ErrorKind::ValidationError,
        ErrorKind::ServerError,
        ErrorKind::NetworkError,
        ErrorKind::UnknownError,
    ];

    /// Kind for an HTTP status, if the status is one the taxonomy names.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(ErrorKind::Unauthorized),
            403 => Some(ErrorKind::Forbidden),
            404 => Some(ErrorKind::NotFound),
            408 => Some(ErrorKind::Timeout),
            422 => Some(ErrorKind::ValidationError),
            500 | 502 | 503 | 504 => Some(ErrorKind::ServerError),
            _ => None,
        }
    }

    /// The fixed user-facing sentence for this kind.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => messages::UNAUTHORIZED,
            ErrorKind::Forbidden => messages::FORBIDDEN,
            ErrorKind::NotFound => messages::NOT_FOUND,
            ErrorKind::Timeout => messages::TIMEOUT,
            ErrorKind::ValidationError => messages::VALIDATION_ERROR,
            ErrorKind::ServerError => messages::SERVER_ERROR,
            ErrorKind::NetworkError => messages::NETWORK_ERROR,
            ErrorKind::UnknownError => messages::UNKNOWN_ERROR,
        }
    }

    /// Stable label, used in logs and metric attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::ServerError => "SERVER_ERROR",
            ErrorKind::NetworkError => "NETWORK_ERROR",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
