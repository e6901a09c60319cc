use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Environment variable holding the upstream credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_ALLOWED_ORIGINS: &str = "https://legimedtrav.vercel.app";

/// Immutable service configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AnswerConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub cors: CorsSettings,
    pub observability: ObservabilitySettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    /// Model name, e.g. gemini-1.5-flash
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
    /// Sampling temperature; upstream default when unset.
    pub temperature: Option<f32>,
    /// Cap on generated tokens; upstream default when unset.
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    /// Granted to callers whose origin is not on the list.
    pub fallback_origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ObservabilitySettings {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

impl AnswerConfig {
    /// Load from the process environment (and `.env`).
    ///
    /// Fails when `GEMINI_API_KEY` is unset or blank: the service never starts
    /// without its upstream credential.
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let api_key = get_env(API_KEY_VAR, None, is_prod)?;
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required but empty",
                API_KEY_VAR
            )));
        }

        let timeout_secs = parse_number(
            "GEMINI_TIMEOUT_SECS",
            &get_env(
                "GEMINI_TIMEOUT_SECS",
                Some(&DEFAULT_TIMEOUT_SECS.to_string()),
                is_prod,
            )?,
        )?;

        Ok(AnswerConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: Secret::new(api_key),
                model: get_env("GEMINI_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_API_BASE), is_prod)?,
                timeout: Duration::from_secs(timeout_secs),
                temperature: optional_number("GEMINI_TEMPERATURE")?,
                max_output_tokens: optional_number("GEMINI_MAX_TOKENS")?,
            },
            cors: CorsSettings {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some(DEFAULT_ALLOWED_ORIGINS),
                    is_prod,
                )?),
                fallback_origin: env::var("CORS_FALLBACK_ORIGIN")
                    .ok()
                    .filter(|o| !o.trim().is_empty()),
            },
            observability: ObservabilitySettings {
                log_level: get_env("LOG_LEVEL", Some("info"), false)?,
                otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                    .ok()
                    .filter(|e| !e.trim().is_empty()),
            },
        })
    }
}

/// Split a comma separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a numeric setting, naming the variable when the value is malformed.
fn parse_number<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has an invalid value {:?}: {}", key, raw, e))
    })
}

/// Numeric setting that may be left unset (or blank).
fn optional_number<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_number(key, &v))
        .transpose()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
