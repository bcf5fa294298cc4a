use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::Cache;
use self::models::{MoodPlaylists, MoodSection, PlaylistSource};
use self::nav::ParseError;

pub mod client;
pub mod fallback;
pub mod models;
pub mod moods;
pub mod nav;
pub mod renderers;

pub const MOODS_BROWSE_ID: &str = "FEmusic_moods_and_genres";
pub const MOOD_CATEGORY_BROWSE_ID: &str = "FEmusic_moods_and_genres_category";

const CACHE_PREFIX: &str = "vibes:moods";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// `hl`, e.g. "en".
    pub language: String,
    /// `gl`, ISO 3166 alpha-2, upper case.
    pub country: String,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("catalog responded with HTTP {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("`params` must not be empty")]
    MissingParams,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("unexpected catalog response: {0}")]
    Parse(#[from] ParseError),
}

/// Anything that can answer an innertube `browse` call.
#[async_trait]
pub trait BrowseSource: Send + Sync {
    async fn browse(
        &self,
        browse_id: &str,
        params: Option<&str>,
        locale: &Locale,
    ) -> Result<Value, UpstreamError>;
}

pub struct MoodService {
    source: Arc<dyn BrowseSource>,
    cache: Option<Arc<Cache>>,
    cache_ttl_secs: u64,
}

impl MoodService {
    pub fn new(
        source: Arc<dyn BrowseSource>,
        cache: Option<Arc<Cache>>,
        cache_ttl_secs: u64,
    ) -> Self {
        MoodService {
            source,
            cache,
            cache_ttl_secs,
        }
    }

    pub async fn mood_categories(&self, locale: &Locale) -> Result<Vec<MoodSection>, ServiceError> {
        let key = cache_key("categories", locale, None);
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let doc = self.source.browse(MOODS_BROWSE_ID, None, locale).await?;
        let sections = moods::parse_mood_categories(&doc)?;
        self.store(&key, &sections).await;
        Ok(sections)
    }

    /// Playlists for one mood/genre `params` token.
    ///
    /// Falls back to the lenient normalizer when the page has keys the strict
    /// parser does not know about.
    pub async fn mood_playlists(
        &self,
        params: &str,
        locale: &Locale,
    ) -> Result<MoodPlaylists, ServiceError> {
        let params = params.trim();
        if params.is_empty() {
            return Err(ServiceError::MissingParams);
        }

        let key = cache_key("playlists", locale, Some(params));
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let doc = self
            .source
            .browse(MOOD_CATEGORY_BROWSE_ID, Some(params), locale)
            .await?;

        let result = match moods::parse_mood_playlists(&doc) {
            Ok(playlists) => MoodPlaylists {
                source: PlaylistSource::Primary,
                playlists,
            },
            Err(e) if e.is_missing_key() => {
                warn!(error = %e, params, "Strict mood playlist parse failed, using fallback");
                MoodPlaylists {
                    source: PlaylistSource::Fallback,
                    playlists: fallback::normalize_mood_playlists(&doc),
                }
            }
            Err(e) => return Err(e.into()),
        };

        if is_cacheable(&result) {
            self.store(&key, &result).await;
        }
        Ok(result)
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let hit = self.cache.as_ref()?.get_json(key).await;
        if hit.is_some() {
            debug!(key, "Cache hit");
        }
        hit
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        if let Some(cache) = &self.cache {
            cache.set_json(key, value, Some(self.cache_ttl_secs)).await;
        }
    }
}

/// An empty fallback list usually means the page layout changed under us;
/// it is served but not cached.
pub fn is_cacheable(result: &MoodPlaylists) -> bool {
    result.source == PlaylistSource::Primary || !result.playlists.is_empty()
}

pub fn cache_key(kind: &str, locale: &Locale, params: Option<&str>) -> String {
    let base = format!("{CACHE_PREFIX}:{kind}:{}:{}", locale.country, locale.language);
    match params {
        Some(p) => format!("{base}:{p}"),
        None => base,
    }
}
