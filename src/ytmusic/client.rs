use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use super::{BrowseSource, Locale, UpstreamError};
use crate::config::Config;

const MUSIC_ORIGIN: &str = "https://music.youtube.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";
const CLIENT_NAME: &str = "WEB_REMIX";

/// Unauthenticated innertube client for the music catalog.
pub struct YtMusicClient {
    http: reqwest::Client,
    base_url: String,
}

impl YtMusicClient {
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_static(MUSIC_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(MUSIC_ORIGIN));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(YtMusicClient {
            http,
            base_url: config.ytmusic_base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// The web client rejects stale versions, so it is derived from today's date.
pub fn client_version() -> String {
    format!("1.{}.01.00", Utc::now().format("%Y%m%d"))
}

pub fn browse_body(browse_id: &str, params: Option<&str>, locale: &Locale) -> Value {
    let mut body = json!({
        "context": {
            "client": {
                "clientName": CLIENT_NAME,
                "clientVersion": client_version(),
                "hl": locale.language,
                "gl": locale.country,
            },
            "user": {},
        },
        "browseId": browse_id,
    });
    if let Some(params) = params {
        body["params"] = Value::String(params.to_string());
    }
    body
}

#[async_trait]
impl BrowseSource for YtMusicClient {
    async fn browse(
        &self,
        browse_id: &str,
        params: Option<&str>,
        locale: &Locale,
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}/browse", self.base_url);
        debug!(browse_id, gl = %locale.country, "Browse request");

        let resp = self
            .http
            .post(&url)
            .query(&[("prettyPrint", "false")])
            .json(&browse_body(browse_id, params, locale))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }
        Ok(resp.json::<Value>().await?)
    }
}
