#![forbid(unsafe_code)]

use clap::Parser;
use request_governor_lib::config::{load_from_path, LoggingConfig, TelemetryConfig};
use request_governor_lib::telemetry::{encode_metrics, init_metrics, init_tracing};
use request_governor_lib::{ApiClient, GovernedError, Governor, SessionIdentity};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Rate-limited, retrying client for the dashboard backend")]
struct Cli {
    /// Path to configuration TOML file
    #[arg(short, long, value_name = "FILE", default_value = "config/governor.toml")]
    config: PathBuf,

    /// Endpoint path to call
    #[arg(short, long, default_value = "/api/products")]
    endpoint: String,

    /// Rate limit policy name
    #[arg(short, long, default_value = "default")]
    policy: String,

    /// Number of governed calls to issue
    #[arg(short = 'n', long, default_value_t = 1)]
    repeat: u32,

    /// Signed-in principal id used for the rate limit key
    #[arg(short, long, env = "GOVERNOR_USER")]
    user: Option<String>,

    /// Print the Prometheus metrics exposition before exiting
    #[arg(long)]
    print_metrics: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cfg = match load_from_path(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            let _ = init_tracing(&LoggingConfig::default(), &TelemetryConfig::default());
            error!(%err, path = %cli.config.display(), "failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(err) = init_tracing(&cfg.logging, &cfg.telemetry) {
        eprintln!("{err}");
        std::process::exit(1);
    }

    info!(
        policies = cfg.policies.len(),
        base_url = %cfg.client.base_url,
        max_retries = cfg.retry.max_retries,
        "configuration loaded"
    );

    let telemetry = if cfg.telemetry.metrics_enabled || cli.print_metrics {
        match init_metrics() {
            Ok(pair) => Some(pair),
            Err(err) => {
                error!(%err, "failed to initialize metrics");
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    let session = Arc::new(SessionIdentity::new());
    if let Some(user) = &cli.user {
        session.set(user.clone());
    }

    let mut governor = Governor::from_config(&cfg, session.clone());
    if let Some((metrics, _)) = &telemetry {
        governor = governor.with_metrics(metrics.clone());
    }

    let client = match ApiClient::new(&cfg.client) {
        Ok(client) => client,
        Err(err) => {
            error!(%err, "failed to build backend client");
            std::process::exit(1);
        }
    };

    let mut failures = 0u32;
    for call in 1..=cli.repeat {
        let result = governor
            .execute(&cli.endpoint, &cli.policy, || client.get(&cli.endpoint))
            .await;

        match result {
            Ok(Some(body)) => {
                info!(call, endpoint = %cli.endpoint, body = %body, "call succeeded");
            }
            Ok(None) => {
                info!(call, endpoint = %cli.endpoint, "resource not found");
            }
            Err(GovernedError::RateLimited { retry_after_secs, message }) => {
                failures += 1;
                warn!(call, retry_after_secs, %message, "call rejected by rate limiter");
            }
            Err(GovernedError::Failed { classification, logout }) => {
                failures += 1;
                match serde_json::to_string(&classification) {
                    Ok(json) => error!(call, classification = %json, "call failed"),
                    Err(_) => error!(call, %classification, "call failed"),
                }
                if let Some(logout) = logout {
                    warn!(message = %logout.message, redirect_to = %logout.redirect_to, "signed out");
                }
            }
        }
    }

    info!(calls = cli.repeat, failures, signed_in = session.is_signed_in(), "done");

    if cli.print_metrics {
        if let Some((_, registry)) = &telemetry {
            match encode_metrics(registry) {
                Ok(text) => print!("{text}"),
                Err(err) => error!(%err, "failed to encode metrics"),
            }
        }
    }
}
