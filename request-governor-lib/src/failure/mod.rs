//! Failure taxonomy for governed calls.
//!
//! Raw failures arrive in a handful of shapes (an HTTP response, an error
//! value that may carry a status, a bare string, an object with a message).
//! They are modelled as the closed [`Failure`] union and reduced by the
//! [`Classifier`] to an [`ErrorClassification`]: one [`ErrorKind`] plus the
//! message to show the user.

mod auth;
mod classifier;
mod input;
mod kind;
pub mod messages;
mod safe;

pub use auth::{handle_auth_error, ForcedLogout, LOGIN_REDIRECT};
pub use classifier::{classify_error, Classifier, ErrorClassification};
pub use input::Failure;
pub use kind::ErrorKind;
pub use safe::SafeError;
