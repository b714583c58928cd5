//! Configuration management for the betting assistant

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::services::cache::CacheTtls;
use crate::services::retry::RetryConfig;
use crate::types::Sport;

/// Assistant configuration loaded from environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the odds/stats proxy endpoints
    pub data_proxy_url: String,

    /// HTTP timeout for proxy calls in seconds
    pub request_timeout_secs: u64,

    /// Sport assumed by the fallback parser when it finds participants but no
    /// sport keyword. `None` disables the backfill.
    pub fallback_default_sport: Option<Sport>,

    /// Cache time-to-live per category
    pub cache_ttls: CacheTtls,

    /// Retry policy for proxy calls
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_proxy_url: "http://localhost:3000/api".to_string(),
            request_timeout_secs: 10,
            fallback_default_sport: Some(Sport::Nba),
            cache_ttls: CacheTtls::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let data_proxy_url = env::var("DATA_PROXY_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.data_proxy_url);

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.request_timeout_secs);

        let fallback_default_sport = match env::var("FALLBACK_DEFAULT_SPORT") {
            Ok(value) => parse_default_sport(&value)?,
            Err(_) => defaults.fallback_default_sport,
        };

        let cache_ttls = CacheTtls {
            odds: ttl_from_env("CACHE_TTL_ODDS_SECS", defaults.cache_ttls.odds),
            stats: ttl_from_env("CACHE_TTL_STATS_SECS", defaults.cache_ttls.stats),
            ai_parsing: ttl_from_env("CACHE_TTL_AI_PARSING_SECS", defaults.cache_ttls.ai_parsing),
        };

        let retry = RetryConfig {
            max_retries: env::var("MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry.max_retries),
            ..defaults.retry
        };

        // Validate configuration
        if !data_proxy_url.starts_with("http://") && !data_proxy_url.starts_with("https://") {
            anyhow::bail!("DATA_PROXY_URL must be an http(s) URL, got {}", data_proxy_url);
        }
        if request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            data_proxy_url,
            request_timeout_secs,
            fallback_default_sport,
            cache_ttls,
            retry,
        })
    }
}

/// Parse the `FALLBACK_DEFAULT_SPORT` setting. Empty or `none` disables the backfill.
pub fn parse_default_sport(value: &str) -> Result<Option<Sport>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    let sport = value
        .parse::<Sport>()
        .map_err(anyhow::Error::msg)
        .context("Invalid FALLBACK_DEFAULT_SPORT")?;
    Ok(Some(sport))
}

fn ttl_from_env(key: &str, default: Duration) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
