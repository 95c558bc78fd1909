use crate::url::extract_host;
use crate::ConfigError;
use url::Url;

/// A host pattern that widens the traversal scope
///
/// Two forms are supported:
/// 1. Exact: `"docs.example.com"` matches only that host
/// 2. Wildcard: `"*.example.com"` matches `example.com` and every subdomain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPattern {
    Exact(String),
    Wildcard(String),
}

impl HostPattern {
    /// Parses and validates a pattern, lowercasing it
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = pattern.trim().to_lowercase();
        match pattern.strip_prefix("*.") {
            Some(base) => {
                validate_host(base)?;
                Ok(Self::Wildcard(base.to_string()))
            }
            None => {
                validate_host(&pattern)?;
                Ok(Self::Exact(pattern))
            }
        }
    }

    /// Checks a lowercase host against the pattern
    pub fn matches(&self, host: &str) -> bool {
        match self {
            Self::Exact(expected) => host == expected,
            Self::Wildcard(base) => {
                host == base
                    || host
                        .strip_suffix(base.as_str())
                        .map_or(false, |prefix| prefix.ends_with('.'))
            }
        }
    }
}

fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "host pattern cannot be empty".to_string(),
        ));
    }

    if !host
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "'{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with(['.', '-']) || host.ends_with(['.', '-']) || host.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "'{}' is not a well-formed host",
            host
        )));
    }

    Ok(())
}

/// Decides which discovered links the traversal may enqueue
///
/// Links are in scope when they use http(s) and their host equals the root host
/// (ports are ignored) or matches one of the extra host patterns.
#[derive(Debug, Clone)]
pub struct Scope {
    root_host: String,
    extra: Vec<HostPattern>,
}

impl Scope {
    /// Same-host scope around `root`
    pub fn same_host(root: &Url) -> Self {
        Self {
            root_host: extract_host(root).unwrap_or_default(),
            extra: Vec::new(),
        }
    }

    /// Same-host scope widened with extra host patterns
    pub fn with_patterns(root: &Url, patterns: &[String]) -> Result<Self, ConfigError> {
        let extra = patterns
            .iter()
            .map(|p| HostPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            root_host: extract_host(root).unwrap_or_default(),
            extra,
        })
    }

    pub fn root_host(&self) -> &str {
        &self.root_host
    }

    /// Returns true if `url` may be enqueued
    pub fn allows(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        let host = match extract_host(url) {
            Some(host) => host,
            None => return false,
        };

        !self.root_host.is_empty() && host == self.root_host
            || self.extra.iter().any(|p| p.matches(&host))
    }
}
