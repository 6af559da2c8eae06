use crate::session::IdentityProvider;

/// Principal used when no identity is present.
pub const ANONYMOUS: &str = "anonymous";

/// Build the rate limit key for `endpoint` and an optional principal.
///
/// # Returns
/// `"{endpoint}_{principal}"`, with [`ANONYMOUS`] for a missing or empty principal
pub fn rate_limit_key(endpoint: &str, principal: Option<&str>) -> String {
    let principal = principal.filter(|p| !p.is_empty()).unwrap_or(ANONYMOUS);
    format!("{endpoint}_{principal}")
}

/// Resolve the rate limit key for `endpoint` using the current identity.
pub fn resolve_key(endpoint: &str, identity: &dyn IdentityProvider) -> String {
    rate_limit_key(endpoint, identity.principal_id().as_deref())
}
