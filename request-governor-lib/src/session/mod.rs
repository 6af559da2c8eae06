//! Session-scoped collaborators the governor reads from its environment:
//! who the current principal is, and whether the network is reachable.

mod connectivity;
mod identity;

pub use connectivity::{AlwaysOnline, Connectivity, ConnectivityFlag};
pub use identity::{IdentityProvider, SessionIdentity};
