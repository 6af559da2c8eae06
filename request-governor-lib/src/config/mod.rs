mod client;
mod loader;
mod policy;
mod retry;
mod telemetry;
mod types;

pub use client::ClientConfig;
pub use loader::{load_from_path, load_from_str, validate};
pub use policy::PolicyConfig;
pub use retry::RetryConfig;
pub use telemetry::{LoggingConfig, TelemetryConfig};
pub use types::Config;
