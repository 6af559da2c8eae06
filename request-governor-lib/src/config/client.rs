use serde::Deserialize;

/// Backend HTTP client configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST backend (plain HTTP)
    /// Default: "http://127.0.0.1:8080"
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token attached as `Authorization` header (optional)
    #[serde(default)]
    pub token: Option<String>,
    /// Per-request timeout in milliseconds
    /// Default: 10000
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// TCP connect timeout in milliseconds
    /// Default: 5000
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// How long idle pooled connections are kept, in seconds
    /// Default: 90
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout_secs: u64,
    /// Maximum idle connections kept per host (0 = hyper default)
    /// Default: 0
    #[serde(default)]
    pub pool_max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            request_timeout_ms: default_request_timeout(),
            connect_timeout_ms: default_connect_timeout(),
            pool_idle_timeout_secs: default_pool_idle_timeout(),
            pool_max_idle_per_host: 0,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_pool_idle_timeout() -> u64 {
    90
}
