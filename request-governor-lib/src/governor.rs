//! The governed-call facade.
//!
//! A [`Governor`] is an explicit context object: build one per application
//! (or per test), share it as `Arc<Governor>`, and route backend calls
//! through [`Governor::execute`].

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::failure::{handle_auth_error, Classifier, ErrorClassification, Failure, ForcedLogout};
use crate::rate_limit::{resolve_key, RateLimitResult, RateLimiter, API_POLICY};
use crate::retry::{retry_with_backoff_notify, RetryPolicy};
use crate::session::{IdentityProvider, SessionIdentity};
use crate::telemetry::Metrics;

/// Why a governed call did not produce a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernedError {
    /// The rate limiter rejected the call; the operation never ran.
    #[error("{message}")]
    RateLimited { retry_after_secs: u64, message: String },
    /// The operation ran and failed. `logout` is set when the failure
    /// ended the session.
    #[error("{classification}")]
    Failed { classification: ErrorClassification, logout: Option<ForcedLogout> },
}

impl GovernedError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GovernedError::RateLimited { .. })
    }

    /// Message to show the user.
    pub fn message(&self) -> &str {
        match self {
            GovernedError::RateLimited { message, .. } => message,
            GovernedError::Failed { classification, .. } => &classification.message,
        }
    }

    pub fn classification(&self) -> Option<&ErrorClassification> {
        match self {
            GovernedError::Failed { classification, .. } => Some(classification),
            GovernedError::RateLimited { .. } => None,
        }
    }

    pub fn logout(&self) -> Option<&ForcedLogout> {
        match self {
            GovernedError::Failed { logout, .. } => logout.as_ref(),
            GovernedError::RateLimited { .. } => None,
        }
    }
}

/// Rate limiting, retry, classification and auth handling for backend calls
pub struct Governor {
    limiter: Arc<RateLimiter>,
    identity: Arc<dyn IdentityProvider>,
    session: Option<Arc<SessionIdentity>>,
    classifier: Classifier,
    retry: RetryPolicy,
    metrics: Option<Arc<Metrics>>,
}

impl Governor {
    /// Governor over `limiter` keyed by `identity`, with the default retry
    /// policy and an always-online classifier.
    pub fn new(limiter: Arc<RateLimiter>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            limiter,
            identity,
            session: None,
            classifier: Classifier::default(),
            retry: RetryPolicy::default(),
            metrics: None,
        }
    }

    /// Build a governor from configuration, keyed by and clearing `session`.
    pub fn from_config(config: &Config, session: Arc<SessionIdentity>) -> Self {
        let limiter = Arc::new(RateLimiter::new(config.policy_table()));
        Self::new(limiter, session.clone())
            .with_session(session)
            .with_retry_policy((&config.retry).into())
    }

    /// Session cleared when a call fails with 401.
    pub fn with_session(mut self, session: Arc<SessionIdentity>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Rate limit key of `endpoint` for the current identity.
    pub fn key_for(&self, endpoint: &str) -> String {
        resolve_key(endpoint, self.identity.as_ref())
    }

    /// Evaluate (and, when admitted, record) one call to `endpoint`.
    pub fn check(&self, endpoint: &str, policy: &str) -> RateLimitResult {
        let key = self.key_for(endpoint);
        let result = self.limiter.check_limit(&key, policy);

        if let Some(metrics) = &self.metrics {
            metrics.record_rate_limit_request(policy, endpoint);
            if result.is_allowed() {
                metrics.record_rate_limit_allowed(policy, endpoint);
            } else {
                metrics.record_rate_limit_rejection(policy, endpoint);
            }
        }

        result
    }

    /// [`check`](Self::check) under `policy`, or the `api` policy when none
    /// is given.
    pub fn check_rate_limit(&self, endpoint: &str, policy: Option<&str>) -> RateLimitResult {
        self.check(endpoint, policy.unwrap_or(API_POLICY))
    }

    /// Forget the current identity's history for `endpoint`.
    pub fn reset(&self, endpoint: &str) {
        self.limiter.reset(&self.key_for(endpoint));
    }

    pub fn clear_all(&self) {
        self.limiter.clear_all();
    }

    /// Run `operation` under the `policy` rate limit with retry and failure
    /// classification.
    ///
    /// Admission is checked once per governed call; retries do not consume
    /// extra slots. A 401 clears the session and every rate limit window.
    pub async fn execute<F, Fut, T>(
        &self,
        endpoint: &str,
        policy: &str,
        operation: F,
    ) -> Result<T, GovernedError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        if let RateLimitResult::Limited { retry_after_secs, message, .. } =
            self.check(endpoint, policy)
        {
            debug!(endpoint, policy, retry_after_secs, "governed call rejected");
            return Err(GovernedError::RateLimited { retry_after_secs, message });
        }

        let start = Instant::now();
        let metrics = self.metrics.clone();
        let result = retry_with_backoff_notify(operation, &self.retry, |_, _, _| {
            if let Some(metrics) = &metrics {
                metrics.record_retry(endpoint);
            }
        })
        .await;

        if let Some(metrics) = &self.metrics {
            metrics.record_operation_duration(start.elapsed().as_secs_f64(), policy, endpoint);
        }

        result.map_err(|failure| self.on_failure(endpoint, &failure))
    }

    fn on_failure(&self, endpoint: &str, failure: &Failure) -> GovernedError {
        let classification = self.classifier.classify(failure);
        warn!(endpoint, kind = %classification.kind, %failure, "governed call failed");

        if let Some(metrics) = &self.metrics {
            metrics.record_failure(classification.kind, endpoint);
        }

        let logout = self
            .session
            .as_ref()
            .and_then(|session| handle_auth_error(failure, session));

        if logout.is_some() {
            self.limiter.clear_all();
            info!(endpoint, "rate limit state cleared after forced logout");
            if let Some(metrics) = &self.metrics {
                metrics.record_forced_logout();
            }
        }

        GovernedError::Failed { classification, logout }
    }
}

impl std::fmt::Debug for Governor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Governor")
            .field("tracked_keys", &self.limiter.tracked_keys())
            .field("retry", &self.retry)
            .field("classifier", &self.classifier)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
