use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_HOTEL: &str = "Taj Lands End";
pub const DEFAULT_CITY: &str = "Mumbai";
pub const DEFAULT_USER_AGENT: &str = "reviq/0.1 (market-intelligence)";

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
/// Decoupled from the process environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let provider_api_key = require("GEMINI_API_KEY")?;
    let env = parse_environment(&or_default("REVIQ_ENV", "development"))?;
    let log_level = or_default("REVIQ_LOG_LEVEL", "info");
    let provider_base_url = or_default("REVIQ_PROVIDER_BASE_URL", DEFAULT_PROVIDER_BASE_URL);
    let model = or_default("REVIQ_MODEL", DEFAULT_MODEL);

    let request_timeout_secs = parse_u64("REVIQ_REQUEST_TIMEOUT_SECS", "60")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "REVIQ_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let user_agent = or_default("REVIQ_USER_AGENT", DEFAULT_USER_AGENT);
    let grounding_enabled = parse_bool("REVIQ_GROUNDING_ENABLED", "true")?;

    let compset_max_distance_km = match lookup("REVIQ_COMPSET_MAX_DISTANCE_KM") {
        Ok(raw) => {
            let km = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| invalid("REVIQ_COMPSET_MAX_DISTANCE_KM", e.to_string()))?;
            if !km.is_finite() || km <= 0.0 {
                return Err(invalid(
                    "REVIQ_COMPSET_MAX_DISTANCE_KM",
                    "must be a positive number of kilometres".to_string(),
                ));
            }
            Some(km)
        }
        Err(_) => None,
    };

    let default_hotel = or_default("REVIQ_DEFAULT_HOTEL", DEFAULT_HOTEL);
    let default_city = or_default("REVIQ_DEFAULT_CITY", DEFAULT_CITY);

    Ok(AppConfig {
        env,
        log_level,
        provider_api_key,
        provider_base_url,
        model,
        request_timeout_secs,
        user_agent,
        grounding_enabled,
        compset_max_distance_km,
        default_hotel,
        default_city,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REVIQ_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
