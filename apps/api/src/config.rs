use anyhow::{Context, Result};

const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";

/// Application configuration loaded from environment variables.
///
/// The gateway credential is optional at startup: a missing key is reported
/// per request as a configuration error, before any upstream call is made.
#[derive(Debug, Clone)]
pub struct Config {
    pub ai_gateway_api_key: Option<String>,
    pub ai_gateway_url: String,
    pub ai_model: String,
    pub ai_timeout_secs: u64,
    /// Extra attempts made after an upstream 429. Zero keeps every call single-shot.
    pub ai_rate_limit_retries: u32,
    pub ai_retry_base_ms: u64,
    pub recruiter_max_concurrency: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ai_gateway_api_key: optional_env("AI_GATEWAY_API_KEY"),
            ai_gateway_url: optional_env("AI_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            ai_model: optional_env("AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ai_timeout_secs: parse_env("AI_TIMEOUT_SECS", 120)?,
            ai_rate_limit_retries: parse_env("AI_RATE_LIMIT_RETRIES", 0)?,
            ai_retry_base_ms: parse_env("AI_RETRY_BASE_MS", 1000)?,
            recruiter_max_concurrency: parse_env::<usize>("RECRUITER_MAX_CONCURRENCY", 4)?.max(1),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration pointing at a local fake gateway, with retries disabled.
    pub fn for_tests(gateway_url: &str, api_key: Option<&str>) -> Self {
        Config {
            ai_gateway_api_key: api_key.map(str::to_string),
            ai_gateway_url: gateway_url.to_string(),
            ai_model: DEFAULT_MODEL.to_string(),
            ai_timeout_secs: 5,
            ai_rate_limit_retries: 0,
            ai_retry_base_ms: 1,
            recruiter_max_concurrency: 2,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
