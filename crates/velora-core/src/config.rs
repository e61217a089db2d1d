use crate::app_config::{AppConfig, Environment};
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

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
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

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
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

    let content_api_url = require("VELORA_CONTENT_API_URL")?;
    let content_api_token = lookup("VELORA_CONTENT_API_TOKEN").ok();

    let env = parse_environment(&or_default("VELORA_ENV", "development"));

    let bind_addr = parse_addr("VELORA_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VELORA_LOG_LEVEL", "info");
    let image_base_url = or_default("VELORA_IMAGE_BASE_URL", "");

    let content_timeout_secs = parse_u64("VELORA_CONTENT_TIMEOUT_SECS", "30")?;
    let content_user_agent = or_default("VELORA_CONTENT_USER_AGENT", "velora/0.1 (content-sync)");
    let content_max_retries = parse_u32("VELORA_CONTENT_MAX_RETRIES", "3")?;
    let content_backoff_base_secs = parse_u64("VELORA_CONTENT_BACKOFF_BASE_SECS", "2")?;
    let content_refresh_secs = parse_u64("VELORA_CONTENT_REFRESH_SECS", "300")?;

    Ok(AppConfig {
        content_api_url,
        content_api_token,
        env,
        bind_addr,
        log_level,
        image_base_url,
        content_timeout_secs,
        content_user_agent,
        content_max_retries,
        content_backoff_base_secs,
        content_refresh_secs,
    })
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
