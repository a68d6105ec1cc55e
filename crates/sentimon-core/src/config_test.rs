use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("SENTIMON_API_URL", "http://localhost:8000");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_fails_without_api_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SENTIMON_API_URL"),
        "expected MissingEnvVar(SENTIMON_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.api_url, "http://localhost:8000");
    assert_eq!(cfg.ws_url, "ws://localhost:8000/ws/sentiment");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "sentimon/0.1 (dashboard)");
    assert_eq!(cfg.posts_limit, 20);
    assert_eq!(cfg.distribution_hours, 24);
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_ms, 1000);
}

#[test]
fn api_url_trailing_slash_is_trimmed() {
    let mut map = full_env();
    map.insert("SENTIMON_API_URL", "http://localhost:8000/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_url, "http://localhost:8000");
    assert_eq!(cfg.ws_url, "ws://localhost:8000/ws/sentiment");
}

#[test]
fn https_api_url_derives_wss_channel() {
    let mut map = full_env();
    map.insert("SENTIMON_API_URL", "https://sentiment.example.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.ws_url, "wss://sentiment.example.com/ws/sentiment");
}

#[test]
fn explicit_ws_url_wins_over_derived() {
    let mut map = full_env();
    map.insert("SENTIMON_WS_URL", "ws://push.internal:9000/live");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.ws_url, "ws://push.internal:9000/live");
}

#[test]
fn non_http_api_url_without_ws_url_is_rejected() {
    let mut map = full_env();
    map.insert("SENTIMON_API_URL", "ftp://localhost");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SENTIMON_API_URL"),
        "expected InvalidEnvVar(SENTIMON_API_URL), got: {result:?}"
    );
}

#[test]
fn posts_limit_override() {
    let mut map = full_env();
    map.insert("SENTIMON_POSTS_LIMIT", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.posts_limit, 50);
}

#[test]
fn posts_limit_out_of_range_is_rejected() {
    let mut map = full_env();
    map.insert("SENTIMON_POSTS_LIMIT", "1000");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SENTIMON_POSTS_LIMIT"),
        "expected InvalidEnvVar(SENTIMON_POSTS_LIMIT), got: {result:?}"
    );
}

#[test]
fn distribution_hours_zero_is_rejected() {
    let mut map = full_env();
    map.insert("SENTIMON_DISTRIBUTION_HOURS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SENTIMON_DISTRIBUTION_HOURS"),
        "expected InvalidEnvVar(SENTIMON_DISTRIBUTION_HOURS), got: {result:?}"
    );
}

#[test]
fn max_retries_invalid() {
    let mut map = full_env();
    map.insert("SENTIMON_MAX_RETRIES", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SENTIMON_MAX_RETRIES"),
        "expected InvalidEnvVar(SENTIMON_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn retry_backoff_base_ms_override() {
    let mut map = full_env();
    map.insert("SENTIMON_RETRY_BACKOFF_BASE_MS", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.retry_backoff_base_ms, 250);
}
