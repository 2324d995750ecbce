use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_HANS_BASE_URL: &str = "https://volcanoes.usgs.gov/hans-public/api/volcano/";
pub const DEFAULT_AMBEE_BASE_URL: &str = "https://api.ambeedata.com/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("VOLCWATCH_ENV", "development"))?;
    let log_level = or_default("VOLCWATCH_LOG_LEVEL", "info");

    let hans_base_url = or_default("VOLCWATCH_HANS_BASE_URL", DEFAULT_HANS_BASE_URL);
    let ambee_base_url = or_default("VOLCWATCH_AMBEE_BASE_URL", DEFAULT_AMBEE_BASE_URL);
    let ambee_api_key = lookup("AMBEE_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let ambee_country = or_default("VOLCWATCH_AMBEE_COUNTRY", "IDN").to_uppercase();

    let user_agent = or_default("VOLCWATCH_USER_AGENT", "volcwatch/0.1 (volcano-alert-map)");
    let request_timeout_secs = parse_u64("VOLCWATCH_REQUEST_TIMEOUT_SECS", "0")?;
    let max_retries = parse_u32("VOLCWATCH_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("VOLCWATCH_RETRY_BACKOFF_BASE_MS", "1000")?;

    let detail_concurrency = parse_usize("VOLCWATCH_DETAIL_CONCURRENCY", "32")?;
    if detail_concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VOLCWATCH_DETAIL_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let refresh_interval_secs = parse_u64("VOLCWATCH_REFRESH_INTERVAL_SECS", "600")?;
    if refresh_interval_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VOLCWATCH_REFRESH_INTERVAL_SECS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        hans_base_url,
        ambee_base_url,
        ambee_api_key,
        ambee_country,
        user_agent,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        detail_concurrency,
        refresh_interval_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VOLCWATCH_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
