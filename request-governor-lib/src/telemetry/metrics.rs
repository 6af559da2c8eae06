use opentelemetry::global;
use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};
use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;

use crate::error::{GovernorError, Result};
use crate::failure::ErrorKind;

pub mod labels {
    pub const POLICY: &str = "policy";
    pub const ENDPOINT: &str = "endpoint";
    pub const ERROR_KIND: &str = "error_kind";
    pub const VERSION: &str = "version";
    pub const RUST_VERSION: &str = "rust_version";
}

#[derive(Clone)]
pub struct Metrics {
    // Rate limiting metrics
    pub rate_limit_requests_total: Counter<u64>,
    pub rate_limit_allowed_total: Counter<u64>,
    pub rate_limit_rejected_total: Counter<u64>,

    // Retry and failure metrics
    pub retries_total: Counter<u64>,
    pub failures_total: Counter<u64>,
    pub forced_logouts_total: Counter<u64>,

    pub operation_duration_seconds: Histogram<f64>,

    // Build info
    pub build_info: Gauge<u64>,
}

impl Metrics {
    pub fn new(meter: Meter) -> Self {
        Self {
            rate_limit_requests_total: meter
                .u64_counter("governor_rate_limit_requests_total")
                .with_description("Total number of calls evaluated by the rate limiter")
                .build(),
            rate_limit_allowed_total: meter
                .u64_counter("governor_rate_limit_allowed_total")
                .with_description("Total number of calls admitted by the rate limiter")
                .build(),
            rate_limit_rejected_total: meter
                .u64_counter("governor_rate_limit_rejected_total")
                .with_description("Total number of calls rejected by the rate limiter")
                .build(),

            retries_total: meter
                .u64_counter("governor_retries_total")
                .with_description("Total number of backoff retries scheduled")
                .build(),
            failures_total: meter
                .u64_counter("governor_failures_total")
                .with_description("Total number of governed calls that failed, by error kind")
                .build(),
            forced_logouts_total: meter
                .u64_counter("governor_forced_logouts_total")
                .with_description("Total number of sessions cleared after an authentication failure")
                .build(),

            operation_duration_seconds: meter
                .f64_histogram("governor_operation_duration_seconds")
                .with_description("Duration of admitted governed calls, retries included, in seconds")
                .build(),

            build_info: meter
                .u64_gauge("governor_build_info")
                .with_description("Build information (version, rust version)")
                .build(),
        }
    }

    /// Set build info metric with version labels
    pub fn set_build_info(&self) {
        let version = env!("CARGO_PKG_VERSION");
        let rust_version = env!("CARGO_PKG_RUST_VERSION");

        self.build_info.record(
            1,
            &[
                KeyValue::new(labels::VERSION, version),
                KeyValue::new(labels::RUST_VERSION, rust_version),
            ],
        );
    }

    pub fn record_rate_limit_request(&self, policy: &str, endpoint: &str) {
        self.rate_limit_requests_total.add(1, &attrs(policy, endpoint));
    }

    pub fn record_rate_limit_allowed(&self, policy: &str, endpoint: &str) {
        self.rate_limit_allowed_total.add(1, &attrs(policy, endpoint));
    }

    pub fn record_rate_limit_rejection(&self, policy: &str, endpoint: &str) {
        self.rate_limit_rejected_total.add(1, &attrs(policy, endpoint));
    }

    pub fn record_retry(&self, endpoint: &str) {
        self.retries_total
            .add(1, &[KeyValue::new(labels::ENDPOINT, endpoint.to_string())]);
    }

    pub fn record_failure(&self, kind: ErrorKind, endpoint: &str) {
        self.failures_total.add(
            1,
            &[
                KeyValue::new(labels::ERROR_KIND, kind.as_str()),
                KeyValue::new(labels::ENDPOINT, endpoint.to_string()),
            ],
        );
    }

    pub fn record_forced_logout(&self) {
        self.forced_logouts_total.add(1, &[]);
    }

    pub fn record_operation_duration(&self, duration: f64, policy: &str, endpoint: &str) {
        self.operation_duration_seconds
            .record(duration, &attrs(policy, endpoint));
    }
}

fn attrs(policy: &str, endpoint: &str) -> [KeyValue; 2] {
    [
        KeyValue::new(labels::POLICY, policy.to_string()),
        KeyValue::new(labels::ENDPOINT, endpoint.to_string()),
    ]
}

/// Install a Prometheus-backed meter provider and build the governor metrics.
pub fn init_metrics() -> Result<(Arc<Metrics>, Registry)> {
    let registry = Registry::default();

    let exporter = opentelemetry_prometheus::exporter()
        .with_registry(registry.clone())
        .build()
        .map_err(|e| GovernorError::Telemetry(format!("Failed to build exporter: {e}")))?;

    let meter_provider = SdkMeterProvider::builder().with_reader(exporter).build();

    global::set_meter_provider(meter_provider);

    let meter = global::meter("request-governor");
    let metrics = Arc::new(Metrics::new(meter));

    metrics.set_build_info();

    Ok((metrics, registry))
}

/// Render the registry in the Prometheus text exposition format.
pub fn encode_metrics(registry: &Registry) -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| GovernorError::Telemetry(format!("Failed to encode metrics: {e}")))?;

    String::from_utf8(buffer)
        .map_err(|e| GovernorError::Telemetry(format!("Metrics are not valid UTF-8: {e}")))
}
