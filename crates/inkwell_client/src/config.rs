//! Client configuration.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Settings for the article list controller and its HTTP source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root without a trailing slash, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Upper bound for one fetch; exceeding it takes the failure path.
    pub timeout: Duration,
    /// Quiet period after the last search keystroke before fetching.
    pub search_debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::ClientConfig;
    use std::time::Duration;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.search_debounce, Duration::from_millis(300));
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = ClientConfig::default().with_base_url("http://localhost:9000/");
        assert_eq!(config.base_url, "http://localhost:9000");
    }
}
