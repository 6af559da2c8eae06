use request_governor_lib::failure::Failure;
use request_governor_lib::rate_limit::{PolicyTable, RateLimitPolicy, RateLimiter};
use request_governor_lib::retry::RetryPolicy;
use request_governor_lib::telemetry::{encode_metrics, init_metrics};
use request_governor_lib::{Governor, SessionIdentity};
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::test]
#[serial]
async fn governed_calls_are_exported() -> TestResult {
    let (metrics, registry) = init_metrics()?;

    let session = Arc::new(SessionIdentity::signed_in("u-1"));
    let table = PolicyTable::default().with("tight", RateLimitPolicy::new(1, 60_000));
    let governor = Governor::new(Arc::new(RateLimiter::new(table)), session.clone())
        .with_session(session)
        .with_retry_policy(RetryPolicy::new(2, Duration::from_millis(1)))
        .with_metrics(metrics);

    let failed: Result<(), _> = governor
        .execute("/orders", "tight", || async { Err(Failure::response(503)) })
        .await;
    assert!(failed.is_err());

    let rejected: Result<(), _> = governor.execute("/orders", "tight", || async { Ok(()) }).await;
    assert!(rejected.is_err());

    let unauthorized: Result<(), _> = governor
        .execute("/profile", "default", || async { Err(Failure::response(401)) })
        .await;
    assert!(unauthorized.is_err());

    let text = encode_metrics(&registry)?;
    for name in [
        "governor_rate_limit_requests",
        "governor_rate_limit_allowed",
        "governor_rate_limit_rejected",
        "governor_retries",
        "governor_failures",
        "governor_forced_logouts",
        "governor_operation_duration_seconds",
        "governor_build_info",
    ] {
        assert!(text.contains(name), "missing {name} in:\n{text}");
    }
    assert!(text.contains("SERVER_ERROR"));
    assert!(text.contains("UNAUTHORIZED"));
    Ok(())
}

#[test]
#[serial]
fn encode_empty_registry() -> TestResult {
    let registry = prometheus::Registry::new();
    assert_eq!(encode_metrics(&registry)?, "");
    Ok(())
}
