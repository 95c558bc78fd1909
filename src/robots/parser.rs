//! Robots.txt policy
//!
//! Allow/deny decisions are delegated to the robotstxt crate; the crawl-delay
//! directive, which that crate does not expose, is read here.

use robotstxt::DefaultMatcher;
use std::time::Duration;

/// Longest crawl delay honored, whatever the site asks for
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Robots.txt rules for one origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsPolicy {
    /// Raw robots.txt content (empty means allow all)
    content: String,
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Creates a permissive policy
    ///
    /// Used when robots.txt is missing or cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
        }
    }

    pub fn is_allow_all(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL or path to check
    /// * `user_agent` - Full user agent string; only its product token is matched
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_allow_all() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, product_token(user_agent), url)
    }

    /// Crawl delay requested for the given user agent, capped at [`MAX_CRAWL_DELAY`]
    ///
    /// A group naming the agent wins over the `*` group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        if self.is_allow_all() {
            return None;
        }

        let agent = product_token(user_agent).to_lowercase();
        let mut group: Vec<String> = Vec::new();
        let mut collecting_agents = false;
        let mut for_wildcard: Option<f64> = None;
        let mut for_agent: Option<f64> = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            if key == "user-agent" {
                if !collecting_agents {
                    group.clear();
                    collecting_agents = true;
                }
                group.push(value.to_lowercase());
                continue;
            }
            collecting_agents = false;

            if key != "crawl-delay" {
                continue;
            }
            let Ok(delay) = value.parse::<f64>() else {
                continue;
            };
            if !delay.is_finite() || delay < 0.0 {
                continue;
            }

            if !agent.is_empty() && group.iter().any(|ua| ua == &agent) {
                for_agent.get_or_insert(delay);
            } else if group.iter().any(|ua| ua == "*") {
                for_wildcard.get_or_insert(delay);
            }
        }

        for_agent
            .or(for_wildcard)
            .map(|secs| Duration::from_secs_f64(secs).min(MAX_CRAWL_DELAY))
    }
}

/// Leading product token of a user agent (`pagesift` in `pagesift/0.1 (+url)`)
fn product_token(user_agent: &str) -> &str {
    let end = user_agent
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(user_agent.len());
    &user_agent[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        let robots = RobotsPolicy::allow_all();
        assert!(robots.is_allowed("/any/path", "TestBot"));
        assert!(robots.is_allowed("https://example.com/admin", "TestBot"));
    }

    #[test]
    fn test_parse_disallow_all() {
        let robots = RobotsPolicy::from_content("User-agent: *\nDisallow: /");
        assert!(!robots.is_allowed("https://example.com/", "TestBot"));
        assert!(!robots.is_allowed("https://example.com/page", "TestBot"));
    }

    #[test]
    fn test_parse_disallow_specific() {
        let robots = RobotsPolicy::from_content("User-agent: *\nDisallow: /admin");
        assert!(robots.is_allowed("https://example.com/", "TestBot"));
        assert!(robots.is_allowed("https://example.com/page", "TestBot"));
        assert!(!robots.is_allowed("https://example.com/admin", "TestBot"));
        assert!(!robots.is_allowed("https://example.com/admin/users", "TestBot"));
    }

    #[test]
    fn test_parse_allow_and_disallow() {
        let robots =
            RobotsPolicy::from_content("User-agent: *\nDisallow: /private\nAllow: /private/public");
        assert!(!robots.is_allowed("https://example.com/private", "TestBot"));
        assert!(robots.is_allowed("https://example.com/private/public", "TestBot"));
    }

    #[test]
    fn test_full_user_agent_matches_product_token() {
        let robots =
            RobotsPolicy::from_content("User-agent: pagesift\nDisallow: /\n\nUser-agent: *\nAllow: /");
        assert!(!robots.is_allowed("https://example.com/page", "pagesift/0.1"));
        assert!(robots.is_allowed("https://example.com/page", "OtherBot/2.0"));
    }

    #[test]
    fn test_invalid_robots_txt() {
        let robots = RobotsPolicy::from_content("This is not valid robots.txt {{{");
        assert!(robots.is_allowed("https://example.com/any/path", "TestBot"));
    }

    #[test]
    fn test_crawl_delay_wildcard() {
        let robots = RobotsPolicy::from_content("User-agent: *\nCrawl-delay: 10\nDisallow: /admin");
        assert_eq!(robots.crawl_delay("TestBot"), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_crawl_delay_specific_agent_wins() {
        let robots = RobotsPolicy::from_content(
            "User-agent: *\nCrawl-delay: 10\n\nUser-agent: TestBot\nCrawl-delay: 5",
        );
        assert_eq!(robots.crawl_delay("TestBot/1.0"), Some(Duration::from_secs(5)));
        assert_eq!(robots.crawl_delay("OtherBot"), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_crawl_delay_decimal_and_cap() {
        let robots = RobotsPolicy::from_content("User-agent: *\nCrawl-delay: 2.5");
        assert_eq!(robots.crawl_delay("TestBot"), Some(Duration::from_millis(2500)));

        let robots = RobotsPolicy::from_content("User-agent: *\nCrawl-delay: 3600");
        assert_eq!(robots.crawl_delay("TestBot"), Some(MAX_CRAWL_DELAY));
    }

    #[test]
    fn test_crawl_delay_multiple_user_agents() {
        let robots = RobotsPolicy::from_content("User-agent: BotA\nUser-agent: BotB\nCrawl-delay: 3");
        assert_eq!(robots.crawl_delay("BotA"), Some(Duration::from_secs(3)));
        assert_eq!(robots.crawl_delay("botb"), Some(Duration::from_secs(3)));
        assert_eq!(robots.crawl_delay("BotC"), None);
    }

    #[test]
    fn test_crawl_delay_absent() {
        let robots = RobotsPolicy::from_content("User-agent: *\nDisallow: /admin");
        assert_eq!(robots.crawl_delay("TestBot"), None);
        assert_eq!(RobotsPolicy::allow_all().crawl_delay("TestBot"), None);
    }

    #[test]
    fn test_product_token() {
        assert_eq!(product_token("pagesift/0.1"), "pagesift");
        assert_eq!(product_token("Test-Bot_2 (+https://x)"), "Test-Bot_2");
        assert_eq!(product_token(""), "");
    }
}
