use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Supplies the identity of the calling session.
pub trait IdentityProvider: Send + Sync {
    /// Current principal id, or `None` when nobody is signed in.
    fn principal_id(&self) -> Option<String>;
}

/// In-memory session identity.
///
/// Reads are lock-free; `set`/`clear` swap the whole value, so a reader never
/// observes a partially updated identity.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    principal: ArcSwapOption<String>,
}

impl SessionIdentity {
    /// Anonymous session.
    pub fn new() -> Self {
        Self { principal: ArcSwapOption::empty() }
    }

    /// Session already signed in as `principal`.
    pub fn signed_in(principal: impl Into<String>) -> Self {
        let session = Self::new();
        session.set(principal);
        session
    }

    /// Record the signed-in principal.
    pub fn set(&self, principal: impl Into<String>) {
        self.principal.store(Some(Arc::new(principal.into())));
    }

    /// Forget the signed-in principal.
    pub fn clear(&self) {
        self.principal.store(None);
    }

    pub fn is_signed_in(&self) -> bool {
        self.principal.load().is_some()
    }
}

impl IdentityProvider for SessionIdentity {
    fn principal_id(&self) -> Option<String> {
        self.principal.load_full().map(|p| p.as_ref().clone())
    }
}
