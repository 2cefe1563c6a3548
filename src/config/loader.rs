//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::config::schema::BalancerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the effective configuration: defaults, then the TOML file at
/// `path` if given, then `PB_*` environment variables. The result is
/// validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<BalancerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => BalancerConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `PB_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut BalancerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("PB_HOST") {
        config.listener.host = host;
    }
    if let Some(port) = parse_var(&lookup, "PB_PORT")? {
        config.listener.port = port;
    }
    if let Some(size) = parse_var(&lookup, "PB_QUEUE_SIZE")? {
        config.queue.size = size;
    }
    if let Some(ticks) = parse_var(&lookup, "PB_GRACEFUL_PERIOD_SECONDS")? {
        config.lifecycle.graceful_period_secs = ticks;
    }
    if let Some(secs) = parse_var(&lookup, "PB_SHUTDOWN_TIMEOUT_SECONDS")? {
        config.timeouts.shutdown_secs = secs;
    }
    if let Some(secs) = parse_var(&lookup, "PB_GET_TIMEOUT_SECONDS")? {
        config.timeouts.get_secs = secs;
    }
    if let Some(secs) = parse_var(&lookup, "PB_POST_TIMEOUT_SECONDS")? {
        config.timeouts.post_secs = secs;
    }
    if let Some(level) = lookup("PB_LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(enabled) = parse_var(&lookup, "PB_METRICS_ENABLED")? {
        config.observability.metrics_enabled = enabled;
    }
    Ok(())
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
    }
}
