use serde::Serialize;
use tracing::info;

use super::input::Failure;
use super::messages;
use crate::session::SessionIdentity;

/// Where a forced logout sends the user.
pub const LOGIN_REDIRECT: &str = "/";

const ELSEWHERE_MARKER: &str = "another device";

/// Instruction to the UI layer after an authentication failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForcedLogout {
    /// Message to show on the login screen
    pub message: String,
    /// Login entry point to navigate to
    pub redirect_to: String,
}

/// Handle an authentication failure.
///
/// Only a 401 is handled: the stored identity is cleared and a
/// [`ForcedLogout`] is returned. Any other failure returns `None` and leaves
/// the session untouched.
pub fn handle_auth_error(failure: &Failure, session: &SessionIdentity) -> Option<ForcedLogout> {
    if failure.status() != Some(401) {
        return None;
    }

    session.clear();

    let elsewhere = failure
        .message()
        .is_some_and(|m| m.to_lowercase().contains(ELSEWHERE_MARKER));
    let message =
        if elsewhere { messages::LOGGED_IN_ELSEWHERE } else { messages::SESSION_EXPIRED };

    info!(elsewhere, "session cleared after authentication failure");

    Some(ForcedLogout { message: message.to_string(), redirect_to: LOGIN_REDIRECT.to_string() })
}
