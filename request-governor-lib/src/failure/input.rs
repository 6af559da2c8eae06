use std::fmt;

/// A raw failure, in one of the shapes the backend and transport produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// An HTTP response with a non-success status.
    Response { status: u16, message: Option<String> },
    /// An error value; may carry a status from a nested response.
    Error { message: String, status: Option<u16> },
    /// A bare message.
    Text(String),
    /// A structured value that may expose a message.
    Object { message: Option<String> },
    /// Nothing usable.
    Unknown,
}

impl Failure {
    pub fn response(status: u16) -> Self {
        Failure::Response { status, message: None }
    }

    pub fn response_with_message(status: u16, message: impl Into<String>) -> Self {
        Failure::Response { status, message: Some(message.into()) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Failure::Error { message: message.into(), status: None }
    }

    /// The HTTP status carried by this failure, directly or nested.
    pub fn status(&self) -> Option<u16> {
        match self {
            Failure::Response { status, .. } => Some(*status),
            Failure::Error { status, .. } => *status,
            Failure::Text(_) | Failure::Object { .. } | Failure::Unknown => None,
        }
    }

    /// The failure's own message, if it has a non-empty one.
    pub fn message(&self) -> Option<&str> {
        let message = match self {
            Failure::Response { message, .. } | Failure::Object { message } => message.as_deref(),
            Failure::Error { message, .. } | Failure::Text(message) => Some(message.as_str()),
            Failure::Unknown => None,
        };
        message.filter(|m| !m.is_empty())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status(), self.message()) {
            (Some(status), Some(message)) => write!(f, "HTTP {status}: {message}"),
            (Some(status), None) => write!(f, "HTTP {status}"),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("unknown failure"),
        }
    }
}

impl std::error::Error for Failure {}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::Text(message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::Text(message.to_string())
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => Failure::error(format!("Request timeout: {err}")),
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected => Failure::error(format!("Failed to fetch: {err}")),
            _ => Failure::error(err.to_string()),
        }
    }
}
