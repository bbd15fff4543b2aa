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

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "http://localhost:3001");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "storedir/0.1 (storefront-directory)");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.liked_stores_path.to_string_lossy(),
        "./.storedir/liked_stores.json"
    );
}

#[test]
fn api_url_trailing_slash_is_stripped() {
    let mut map = HashMap::new();
    map.insert("STOREDIR_API_URL", "https://stores.example.com/api/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "https://stores.example.com/api");
}

#[test]
fn api_url_without_scheme_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STOREDIR_API_URL", "localhost:3001");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREDIR_API_URL"),
        "expected InvalidEnvVar(STOREDIR_API_URL), got: {result:?}"
    );
}

#[test]
fn api_url_without_host_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STOREDIR_API_URL", "http://");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("STOREDIR_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("STOREDIR_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STOREDIR_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(STOREDIR_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn request_timeout_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STOREDIR_REQUEST_TIMEOUT_SECS", "0");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn liked_stores_path_override() {
    let mut map = HashMap::new();
    map.insert("STOREDIR_LIKED_STORES_PATH", "/tmp/likes.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.liked_stores_path.to_string_lossy(), "/tmp/likes.json");
}
