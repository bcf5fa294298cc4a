use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::{net::SocketAddr, str::FromStr};

use crate::server::geo::normalize_country;

const DEFAULT_BASE_URL: &str = "https://music.youtube.com/youtubei/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub ytmusic_base_url: String,
    pub language: String,
    pub default_country: String,
    /// `None` disables response caching.
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    pub http_cache_max_age: u64,
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok(); // .env is optional, plain env vars work too
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let string_or = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let raw_country = string_or("DEFAULT_COUNTRY", "US");
        let Some(default_country) = normalize_country(&raw_country) else {
            bail!("DEFAULT_COUNTRY must be a two-letter country code, got {raw_country:?}");
        };

        let redis_url = match lookup("REDIS_URL") {
            Some(url) if url.trim().is_empty() => None,
            Some(url) => Some(url.trim().to_string()),
            None => Some("redis://127.0.0.1:6379".to_string()),
        };

        Ok(Config {
            bind_addr: parse_or(&lookup, "VIBES_BIND_ADDR", "127.0.0.1:8000")?,
            ytmusic_base_url: string_or("YTMUSIC_BASE_URL", DEFAULT_BASE_URL),
            language: string_or("YTMUSIC_LANGUAGE", "en"),
            default_country,
            redis_url,
            cache_ttl_secs: parse_or(&lookup, "CACHE_TTL_SECS", "3600")?,
            http_cache_max_age: parse_or(&lookup, "HTTP_CACHE_MAX_AGE", "3600")?,
            upstream_timeout_secs: parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", "15")?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: {raw:?}"))
}
