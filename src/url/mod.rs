//! URL handling module for Pagesift
//!
//! This module provides link normalization, host extraction, and the scope policy
//! that decides which discovered links the traversal may follow.

mod normalize;
mod scope;

pub use normalize::{normalize_url, parse_root_url};
pub use scope::{HostPattern, Scope};

use url::Url;

/// Extracts the lowercase host of a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pagesift::url::extract_host;
///
/// let url = Url::parse("https://Blog.Example.COM:8443/post").unwrap();
/// assert_eq!(extract_host(&url), Some("blog.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the robots.txt location for the origin of `url`
pub fn robots_url(url: &Url) -> Option<Url> {
    if url.host_str().is_none() {
        return None;
    }
    url.join("/robots.txt").ok()
}
