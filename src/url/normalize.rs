use crate::UrlError;
use std::collections::BTreeMap;
use url::form_urlencoded;
use url::Url;

/// Canonicalizes a URL string into the form used as the dedup key
///
/// Two network-equivalent URLs (same scheme/host/port/path/query up to
/// parameter order and duplicate keys, ignoring fragments) canonicalize to
/// the same string.
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; the parser lowercases scheme and host
/// 2. Strip default ports (80 for http, 443 for https)
/// 3. Strip trailing `/` from the path unless the path is exactly `/`
/// 4. Drop the fragment entirely
/// 5. For queries: keep blank values, collapse duplicate keys keeping the
///    last occurrence, sort keys lexicographically, re-encode; an empty
///    query is removed
///
/// This is a total function: on any parse failure it logs a warning and
/// returns the input unchanged, so a malformed URL still gets a stable key.
///
/// # Examples
///
/// ```
/// use webtrail::url::canonicalize;
///
/// assert_eq!(
///     canonicalize("HTTPS://EX.COM:443/a/"),
///     canonicalize("https://ex.com/a"),
/// );
/// ```
pub fn canonicalize(raw: &str) -> String {
    match try_canonicalize(raw) {
        Ok(canonical) => canonical,
        Err(e) => {
            tracing::warn!("Failed to canonicalize URL {}: {}", raw, e);
            raw.to_string()
        }
    }
}

fn try_canonicalize(raw: &str) -> Result<String, UrlError> {
    // Url::parse lowercases the scheme and host, and default ports are
    // omitted on serialization.
    let mut url = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            url.set_path("/");
        } else {
            url.set_path(&trimmed);
        }
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let params = normalize_query(&url);
        if params.is_empty() {
            url.set_query(None);
        } else {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (key, value) in &params {
                serializer.append_pair(key, value);
            }
            let query = serializer.finish();
            url.set_query(Some(&query));
        }
    }

    Ok(url.to_string())
}

/// Collapses duplicate query keys (last occurrence wins) and sorts by key
///
/// Last-wins is a deliberate compatibility choice, not an obviously correct
/// one: HTML forms are often interpreted first-wins, but the dedup key must
/// stay stable with what earlier crawl runs produced.
fn normalize_query(url: &Url) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for (key, value) in url.query_pairs() {
        params.insert(key.into_owned(), value.into_owned());
    }
    params
}
