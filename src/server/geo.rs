use hyper::header::{HeaderMap, ACCEPT_LANGUAGE};

/// Edge/CDN headers carrying the caller's country, most trusted first.
const COUNTRY_HEADERS: [&str; 3] = ["cf-ipcountry", "x-vercel-ip-country", "x-country-code"];

/// Cloudflare's "unknown" marker.
const UNKNOWN_COUNTRY: &str = "XX";

pub fn normalize_country(raw: &str) -> Option<String> {
    let code = raw.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let code = code.to_ascii_uppercase();
    (code != UNKNOWN_COUNTRY).then_some(code)
}

/// Region subtag of the first language range, e.g. `GB` for `en-GB,en;q=0.9`.
pub fn country_from_accept_language(value: &str) -> Option<String> {
    let first = value.split(',').next()?.split(';').next()?.trim();
    first
        .split(['-', '_'])
        .skip(1)
        .find_map(normalize_country)
}

pub fn detect_country(headers: &HeaderMap, explicit: Option<&str>, default: &str) -> String {
    if let Some(code) = explicit.and_then(normalize_country) {
        return code;
    }

    COUNTRY_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name)?.to_str().ok())
        .find_map(normalize_country)
        .or_else(|| {
            headers
                .get(ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .and_then(country_from_accept_language)
        })
        .unwrap_or_else(|| default.to_string())
}
