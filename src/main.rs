mod cache;
mod config;
mod error;
mod server;
mod ytmusic;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    cache::Cache,
    config::Config,
    server::routes::AppState,
    ytmusic::{client::YtMusicClient, MoodService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // ── Logging setup ────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vibes_api=info"));
    fmt().with_env_filter(filter).init();

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load()?;

    // ── Try Redis (optional — the API works without it) ──────────────────────
    let cache = match config.redis_url.as_deref() {
        Some(url) => connect_cache(url).await,
        None => {
            info!("REDIS_URL is empty, response caching disabled");
            None
        }
    };

    // ── Upstream + HTTP server ───────────────────────────────────────────────
    let client = YtMusicClient::new(&config).context("Failed to build catalog client")?;
    let state = Arc::new(AppState {
        moods: MoodService::new(Arc::new(client), cache, config.cache_ttl_secs),
        language: config.language.clone(),
        default_country: config.default_country.clone(),
        http_cache_max_age: config.http_cache_max_age,
    });

    server::serve(config.bind_addr, state).await
}

async fn connect_cache(redis_url: &str) -> Option<Arc<Cache>> {
    match Cache::new(redis_url) {
        Ok(c) if c.ping().await => {
            info!("Redis connected at {redis_url}");
            Some(Arc::new(c))
        }
        Ok(_) => {
            warn!("Redis not reachable at {redis_url}, response caching disabled");
            None
        }
        Err(e) => {
            warn!("Invalid REDIS_URL ({e}), response caching disabled");
            None
        }
    }
}
