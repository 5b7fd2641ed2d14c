use crate::app_config::{AppConfig, Environment, ShopToken};
use crate::ConfigError;

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

/// Load configuration from the variables already in the process, without
/// reading `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse and validate configuration from an arbitrary lookup, so tests can
/// feed a plain map instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("OPTIN_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_as("OPTIN_BIND_ADDR", &or_default("OPTIN_BIND_ADDR", "0.0.0.0:3000"))?;
    let log_level = or_default("OPTIN_LOG_LEVEL", "info");

    let db_max_connections = parse_as("OPTIN_DB_MAX_CONNECTIONS", &or_default("OPTIN_DB_MAX_CONNECTIONS", "10"))?;
    let db_min_connections = parse_as("OPTIN_DB_MIN_CONNECTIONS", &or_default("OPTIN_DB_MIN_CONNECTIONS", "1"))?;
    let db_acquire_timeout_secs = parse_as(
        "OPTIN_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("OPTIN_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let upload_max_bytes = parse_as("OPTIN_UPLOAD_MAX_BYTES", &or_default("OPTIN_UPLOAD_MAX_BYTES", "2097152"))?;
    let upload_body_limit_bytes = parse_as(
        "OPTIN_UPLOAD_BODY_LIMIT_BYTES",
        &or_default("OPTIN_UPLOAD_BODY_LIMIT_BYTES", "8388608"),
    )?;

    let rate_limit_max_requests = parse_as(
        "OPTIN_RATE_LIMIT_MAX_REQUESTS",
        &or_default("OPTIN_RATE_LIMIT_MAX_REQUESTS", "120"),
    )?;
    let rate_limit_window_secs = parse_as(
        "OPTIN_RATE_LIMIT_WINDOW_SECS",
        &or_default("OPTIN_RATE_LIMIT_WINDOW_SECS", "60"),
    )?;

    let shop_tokens = parse_shop_tokens(&or_default("OPTIN_SHOP_TOKENS", ""))?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        upload_max_bytes,
        upload_body_limit_bytes,
        rate_limit_max_requests,
        rate_limit_window_secs,
        shop_tokens,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "OPTIN_ENV".to_string(),
            reason: format!("unknown environment '{other}'; expected development, test or production"),
        }),
    }
}

/// Parse `shop=token` pairs separated by commas. Blank entries are skipped.
fn parse_shop_tokens(raw: &str) -> Result<Vec<ShopToken>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (shop, token) = entry
                .split_once('=')
                .map(|(s, t)| (s.trim(), t.trim()))
                .filter(|(s, t)| !s.is_empty() && !t.is_empty())
                .ok_or_else(|| ConfigError::InvalidEnvVar {
                    var: "OPTIN_SHOP_TOKENS".to_string(),
                    reason: "entries must be shop=token".to_string(),
                })?;
            Ok(ShopToken {
                shop: shop.to_string(),
                token: token.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
