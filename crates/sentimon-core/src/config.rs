use std::ops::RangeInclusive;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Path of the push channel relative to the API origin.
const WS_PATH: &str = "/ws/sentiment";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bounded = |var: &str,
                         default: &str,
                         range: RangeInclusive<u32>|
     -> Result<u32, ConfigError> {
        let value = parse_u32(var, default)?;
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!(
                    "{value} is outside {}..={}",
                    range.start(),
                    range.end()
                ),
            })
        }
    };

    let api_url = require("SENTIMON_API_URL")?
        .trim_end_matches('/')
        .to_string();
    let ws_url = match lookup("SENTIMON_WS_URL") {
        Ok(url) => url,
        Err(_) => derive_ws_url(&api_url)?,
    };

    let env = parse_environment(&or_default("SENTIMON_ENV", "development"));
    let log_level = or_default("SENTIMON_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SENTIMON_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SENTIMON_USER_AGENT", "sentimon/0.1 (dashboard)");
    let posts_limit = parse_bounded("SENTIMON_POSTS_LIMIT", "20", 1..=100)?;
    let distribution_hours = parse_bounded("SENTIMON_DISTRIBUTION_HOURS", "24", 1..=168)?;
    let max_retries = parse_u32("SENTIMON_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("SENTIMON_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        env,
        log_level,
        api_url,
        ws_url,
        request_timeout_secs,
        user_agent,
        posts_limit,
        distribution_hours,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Derive the push channel URL from the REST base URL by swapping the scheme
/// and appending the channel path.
fn derive_ws_url(api_url: &str) -> Result<String, ConfigError> {
    let origin = if let Some(rest) = api_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = api_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return Err(ConfigError::InvalidEnvVar {
            var: "SENTIMON_API_URL".to_string(),
            reason: format!("expected an http:// or https:// URL, got '{api_url}'"),
        });
    };
    Ok(format!("{}{WS_PATH}", origin.trim_end_matches('/')))
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
