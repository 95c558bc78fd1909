use crate::{ConfigError, UrlError};
use url::Url;

/// Query parameters that only carry tracking information
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid", "msclkid"];

/// Normalizes a discovered link into the traversal's dedup key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only http and https
/// 3. Require a host
/// 4. Drop the fragment
/// 5. Drop tracking query parameters (`utm_*`, `fbclid`, ...) keeping the order of
///    the rest, and drop an empty query string
///
/// Host case and the empty path are already canonicalized by the `url` crate. Path
/// and trailing slashes are left untouched: two spellings that a server may treat
/// differently stay two URLs.
///
/// # Examples
///
/// ```
/// use pagesift::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/page?utm_source=x#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if let Some(query) = url.query().map(str::to_owned) {
        let segments: Vec<&str> = query.split('&').collect();
        let kept: Vec<&str> = segments
            .iter()
            .copied()
            .filter(|segment| !is_tracking_param(segment.split('=').next().unwrap_or_default()))
            .collect();

        // Rewrite only when something was dropped, so the server sees the
        // query exactly as the page linked it
        if query.is_empty() || kept.iter().all(|segment| segment.is_empty()) {
            url.set_query(None);
        } else if kept.len() < segments.len() {
            let rebuilt = kept.join("&");
            url.set_query(Some(&rebuilt));
        }
    }

    Ok(url)
}

/// Validates and normalizes the root URL of a traversal
///
/// A bare host such as `example.com` is accepted and treated as `https://`.
/// Anything else that does not normalize is a configuration error, raised before
/// the first fetch.
pub fn parse_root_url(root_url: &str) -> Result<Url, ConfigError> {
    let trimmed = root_url.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidUrl("root URL is empty".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    normalize_url(&candidate)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", root_url, e)))
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
