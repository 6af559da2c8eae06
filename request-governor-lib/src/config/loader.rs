use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{GovernorError, Result};

pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<Config> {
    let txt = fs::read_to_string(p)
        .map_err(|e| GovernorError::Config(format!("Failed to read config file: {e}")))?;
    load_from_str(&txt)
}

pub fn load_from_str(txt: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(txt)
        .map_err(|e| GovernorError::Config(format!("Failed to parse config: {e}")))?;

    validate(&cfg)?;

    Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
    for (name, policy) in &cfg.policies {
        if name.trim().is_empty() {
            return Err(GovernorError::Config("policy name cannot be empty".into()));
        }
        if policy.max_requests == 0 {
            return Err(GovernorError::Config(format!(
                "policy '{name}': max_requests must be > 0"
            )));
        }
        if policy.window_ms == 0 {
            return Err(GovernorError::Config(format!("policy '{name}': window_ms must be > 0")));
        }
    }

    if cfg.retry.max_retries == 0 {
        return Err(GovernorError::Config("retry.max_retries must be > 0".into()));
    }
    if let Some(max) = cfg.retry.max_delay_ms {
        if max < cfg.retry.initial_delay_ms {
            return Err(GovernorError::Config(
                "retry.max_delay_ms must be >= retry.initial_delay_ms".into(),
            ));
        }
    }

    let uri: http::Uri = cfg.client.base_url.parse()?;
    if uri.scheme_str() != Some("http") {
        return Err(GovernorError::Config(format!(
            "client.base_url must use the http scheme: {}",
            cfg.client.base_url
        )));
    }
    if uri.authority().is_none() {
        return Err(GovernorError::Config(format!(
            "client.base_url is missing a host: {}",
            cfg.client.base_url
        )));
    }
    if cfg.client.request_timeout_ms == 0 {
        return Err(GovernorError::Config("client.request_timeout_ms must be > 0".into()));
    }
    if cfg.client.connect_timeout_ms == 0 {
        return Err(GovernorError::Config("client.connect_timeout_ms must be > 0".into()));
    }

    Ok(())
}
