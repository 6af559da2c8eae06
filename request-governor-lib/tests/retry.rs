use request_governor_lib::failure::Failure;
use request_governor_lib::retry::{retry_with_backoff, retry_with_backoff_notify, RetryPolicy};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Paused time advances in whole timer ticks; allow a millisecond of slack.
fn assert_elapsed(actual: Duration, expected: Duration) {
    assert!(
        actual >= expected && actual <= expected + Duration::from_millis(2),
        "expected ~{expected:?}, got {actual:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_fails_twice_then_succeeds() {
    let calls = AtomicU32::new(0);
    let attempt_times = Mutex::new(Vec::new());
    let start = Instant::now();

    let result = retry_with_backoff(
        || async {
            if let Ok(mut times) = attempt_times.lock() {
                times.push(start.elapsed());
            }
            match calls.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => Err(Failure::response(503)),
                _ => Ok("data"),
            }
        },
        &RetryPolicy::new(3, Duration::from_millis(1000)),
    )
    .await;

    assert_eq!(result, Ok("data"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let times = attempt_times.lock().map(|t| t.clone()).unwrap_or_default();
    assert_eq!(times.len(), 3);
    assert_elapsed(times[1] - times[0], Duration::from_millis(1000));
    assert_elapsed(times[2] - times[1], Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_returns_immediately() {
    for status in [401, 403, 422] {
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), Failure> = retry_with_backoff(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Failure::response(status))
            },
            &RetryPolicy::default(),
        )
        .await;

        assert_eq!(result, Err(Failure::response(status)));
        assert_eq!(calls.load(Ordering::SeqCst), 1, "status {status}");
        assert_elapsed(start.elapsed(), Duration::ZERO);
    }
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_returns_last_failure() {
    let calls = AtomicU32::new(0);
    let start = Instant::now();

    let result: Result<(), Failure> = retry_with_backoff(
        || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Err(Failure::error(format!("Failed to fetch #{n}")))
        },
        &RetryPolicy::new(3, Duration::from_millis(100)),
    )
    .await;

    assert_eq!(result, Err(Failure::error("Failed to fetch #2")));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // 100ms + 200ms, no sleep after the last attempt
    assert_elapsed(start.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_single_attempt_policy() {
    let calls = AtomicU32::new(0);

    let result: Result<(), Failure> = retry_with_backoff(
        || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Failure::response(500))
        },
        &RetryPolicy::new(1, Duration::from_millis(1000)),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_notify_reports_capped_delays() {
    let mut delays = Vec::new();
    let policy =
        RetryPolicy::new(5, Duration::from_millis(1000)).with_max_delay(Duration::from_millis(3000));

    let result: Result<(), Failure> = retry_with_backoff_notify(
        || async { Err(Failure::response(502)) },
        &policy,
        |attempt, _, delay| delays.push((attempt, delay)),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(
        delays,
        vec![
            (0, Duration::from_millis(1000)),
            (1, Duration::from_millis(2000)),
            (2, Duration::from_millis(3000)),
            (3, Duration::from_millis(3000)),
        ]
    );
}
