//! Common utilities shared across Bring API tools.
//!
//! URL construction, credential headers and response shaping.

use anyhow::{Context, anyhow};
use reqwest::Url;
use serde_json::Value;

use crate::core::config::BringConfig;

/// Header carrying the Mybring user id.
pub const UID_HEADER: &str = "X-Mybring-API-Uid";

/// Header carrying the Mybring API key.
pub const KEY_HEADER: &str = "X-Mybring-API-Key";

/// Build `{base}/address/api/{country}/addresses/suggestions?q={query}&limit={limit}`.
///
/// The country code is encoded as a single path segment.
pub fn suggestions_url(
    base_url: &str,
    country_code: &str,
    query: &str,
    limit: u32,
) -> anyhow::Result<Url> {
    let mut url =
        Url::parse(base_url).with_context(|| format!("invalid Bring base URL '{}'", base_url))?;

    url.path_segments_mut()
        .map_err(|_| anyhow!("Bring base URL '{}' cannot carry a path", base_url))?
        .pop_if_empty()
        .extend(["address", "api", country_code, "addresses", "suggestions"]);

    url.query_pairs_mut()
        .append_pair("q", query)
        .append_pair("limit", &limit.to_string());

    Ok(url)
}

/// Credential header values. Missing credentials become empty strings.
pub fn credentials(config: &BringConfig) -> (&str, &str) {
    (
        config.api_uid.as_deref().unwrap_or_default(),
        config.api_key.as_deref().unwrap_or_default(),
    )
}

/// Pull the `addresses` field out of a suggestions response.
///
/// A missing or null field yields an empty list.
pub fn extract_addresses(body: Value) -> Value {
    match body {
        Value::Object(mut map) => map
            .remove("addresses")
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    }
}
