use serde::Deserialize;
use std::collections::BTreeMap;

use super::client::ClientConfig;
use super::policy::PolicyConfig;
use super::retry::RetryConfig;
use super::telemetry::{LoggingConfig, TelemetryConfig};
use crate::rate_limit::PolicyTable;

/// Main configuration structure
///
/// Every section is optional; an empty file yields the built-in defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Rate limit policies by name
    /// Entries override the built-in `default`, `login` and `api` policies
    /// with the same name, and add new names otherwise
    /// Example:
    /// ```toml
    /// [policies.login]
    /// max_requests = 5
    /// window_ms = 300000
    /// ```
    #[serde(default)]
    pub policies: BTreeMap<String, PolicyConfig>,
    /// Retry-with-backoff configuration
    #[serde(default)]
    pub retry: RetryConfig,
    /// Backend HTTP client configuration
    #[serde(default)]
    pub client: ClientConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Build the policy table: built-in defaults overlaid with configured policies.
    pub fn policy_table(&self) -> PolicyTable {
        let mut table = PolicyTable::default();
        for (name, policy) in &self.policies {
            table.insert(name.clone(), policy.into());
        }
        table
    }
}
