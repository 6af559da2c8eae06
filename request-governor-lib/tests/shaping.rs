use request_governor_lib::shaping::{debounce, throttle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};

type Log = Arc<Mutex<Vec<(u32, u128)>>>;

fn recorder(start: Instant) -> (Log, impl Fn(u32) + Send + Sync + 'static) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let record = move |arg: u32| {
        if let Ok(mut entries) = sink.lock() {
            entries.push((arg, start.elapsed().as_millis()));
        }
    };
    (log, record)
}

fn entries(log: &Log) -> Vec<(u32, u128)> {
    log.lock().map(|e| e.clone()).unwrap_or_default()
}

#[tokio::test(start_paused = true)]
async fn test_throttle_burst_runs_first_and_last() {
    let start = Instant::now();
    let (log, record) = recorder(start);
    let throttled = throttle(record, Duration::from_millis(1000));

    for arg in 0..5 {
        throttled.call(arg);
        sleep(Duration::from_millis(200)).await;
    }
    sleep(Duration::from_millis(1000)).await;

    let runs = entries(&log);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0], (0, 0));
    assert_eq!(runs[1].0, 4);
    assert!((1000..=1002).contains(&runs[1].1), "deferred run at {}ms", runs[1].1);
}

#[tokio::test(start_paused = true)]
async fn test_throttle_runs_immediately_after_delay() {
    let start = Instant::now();
    let (log, record) = recorder(start);
    let throttled = throttle(record, Duration::from_millis(1000));

    throttled.call(1);
    sleep(Duration::from_millis(1500)).await;
    throttled.call(2);
    assert!(!throttled.is_pending());

    let runs = entries(&log);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[1].0, 2);
    assert!((1500..=1502).contains(&runs[1].1));
}

#[tokio::test(start_paused = true)]
async fn test_throttle_single_pending_execution() {
    let start = Instant::now();
    let (log, record) = recorder(start);
    let throttled = throttle(record, Duration::from_millis(500));

    throttled.call(0);
    for arg in 1..20 {
        throttled.call(arg);
    }
    assert!(throttled.is_pending());

    sleep(Duration::from_millis(600)).await;
    let runs = entries(&log);
    assert_eq!(runs.iter().map(|(arg, _)| *arg).collect::<Vec<_>>(), vec![0, 19]);
    assert!(!throttled.is_pending());
}

#[tokio::test(start_paused = true)]
async fn test_debounce_runs_once_after_quiet_period() {
    let start = Instant::now();
    let (log, record) = recorder(start);
    let debounced = debounce(record, Duration::from_millis(300));

    for arg in 0..10 {
        debounced.call(arg);
        sleep(Duration::from_millis(100)).await;
    }
    assert!(entries(&log).is_empty());

    sleep(Duration::from_millis(500)).await;
    let runs = entries(&log);
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].0, 9);
    // last call at 900ms
    assert!((1200..=1202).contains(&runs[0].1), "ran at {}ms", runs[0].1);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_separate_bursts() {
    let start = Instant::now();
    let (log, record) = recorder(start);
    let debounced = debounce(record, Duration::from_millis(100));

    debounced.call(1);
    sleep(Duration::from_millis(250)).await;
    debounced.call(2);
    sleep(Duration::from_millis(250)).await;

    let args: Vec<u32> = entries(&log).into_iter().map(|(arg, _)| arg).collect();
    assert_eq!(args, vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_execution() {
    let start = Instant::now();
    let (log, record) = recorder(start);
    let debounced = debounce(record, Duration::from_millis(300));
    debounced.call(7);
    assert!(debounced.is_pending());
    drop(debounced);

    let (throttle_log, throttle_record) = recorder(start);
    let throttled = throttle(throttle_record, Duration::from_millis(300));
    throttled.call(1);
    throttled.call(2);
    drop(throttled);

    sleep(Duration::from_millis(1000)).await;
    assert!(entries(&log).is_empty());
    assert_eq!(entries(&throttle_log), vec![(1, 0)]);
}
