use http_body_util::Full;
use hyper::{
    body::Bytes,
    header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE},
    Method, Request, Response, StatusCode,
};
use serde::Serialize;
use serde_json::json;
use std::{collections::HashMap, convert::Infallible, sync::Arc};
use tracing::{info, warn};

use super::geo::detect_country;
use crate::{
    error::ApiError,
    ytmusic::{models::PlaylistSource, Locale, MoodService},
};

pub struct AppState {
    pub moods: MoodService,
    pub language: String,
    pub default_country: String,
    pub http_cache_max_age: u64,
}

/// JSON body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PlaylistSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    fn ok(country: String, data: T) -> Self {
        Envelope {
            success: true,
            country: Some(country),
            source: None,
            data: Some(data),
            error: None,
        }
    }
}

/// What a handler needs from the request, detached from its body.
struct RequestParts {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    country: String,
}

/// Percent-decodes `a=1&b=2`. Later duplicates win.
pub fn parse_query(raw: Option<&str>) -> HashMap<String, String> {
    raw.unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = urlencoding::decode(parts.next()?).ok()?.into_owned();
            let value = urlencoding::decode(parts.next().unwrap_or("")).ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

pub async fn handle<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let query = parse_query(req.uri().query());
    let country = detect_country(
        req.headers(),
        query.get("country").map(String::as_str),
        &state.default_country,
    );
    let parts = RequestParts {
        method: req.method().clone(),
        path: req.uri().path().to_string(),
        query,
        country,
    };
    drop(req);

    let response = match dispatch(&parts, &state).await {
        Ok(resp) => resp,
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                warn!(path = %parts.path, error = %e, "Request failed");
            }
            let body: Envelope<()> = Envelope {
                success: false,
                country: None,
                source: None,
                data: None,
                error: Some(e.to_string()),
            };
            json_response(status, &body, "no-store")
        }
    };
    info!(
        method = %parts.method,
        path = %parts.path,
        status = response.status().as_u16(),
        "Handled"
    );
    Ok(response)
}

async fn dispatch(
    parts: &RequestParts,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ApiError> {
    let cache_control = format!("public, max-age={}", state.http_cache_max_age);
    let locale = Locale {
        language: state.language.clone(),
        country: parts.country.clone(),
    };

    match (&parts.method, parts.path.as_str()) {
        (&Method::GET, "/health") => Ok(json_response(
            StatusCode::OK,
            &json!({ "status": "ok" }),
            "no-store",
        )),
        (&Method::GET, "/api/moods") => {
            let sections = state.moods.mood_categories(&locale).await?;
            let body = Envelope::ok(locale.country, sections);
            Ok(json_response(StatusCode::OK, &body, &cache_control))
        }
        (&Method::GET, "/api/moods/playlists") => {
            let params = parts
                .query
                .get("params")
                .ok_or_else(|| ApiError::BadRequest("missing `params` query parameter".into()))?;
            let result = state.moods.mood_playlists(params, &locale).await?;
            let mut body = Envelope::ok(locale.country, result.playlists);
            body.source = Some(result.source);
            Ok(json_response(StatusCode::OK, &body, &cache_control))
        }
        (_, "/health" | "/api/moods" | "/api/moods/playlists") => Err(ApiError::MethodNotAllowed),
        _ => Err(ApiError::NotFound),
    }
}

fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    cache_control: &str,
) -> Response<Full<Bytes>> {
    let (status, bytes) = match serde_json::to_vec(body) {
        Ok(bytes) => (status, bytes),
        Err(e) => {
            warn!("Failed to serialize response: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                br#"{"success":false,"error":"internal error"}"#.to_vec(),
            )
        }
    };

    let mut resp = Response::new(Full::new(Bytes::from(bytes)));
    *resp.status_mut() = status;
    let headers = resp.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let cache_value = HeaderValue::from_str(cache_control)
        .unwrap_or_else(|_| HeaderValue::from_static("no-store"));
    headers.insert(CACHE_CONTROL, cache_value);
    resp
}
