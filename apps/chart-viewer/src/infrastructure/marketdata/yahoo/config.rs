//! Yahoo adapter configuration.

use std::time::Duration;

use crate::config::ProviderConfig;

/// Production chart API host.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Configuration for the Yahoo chart adapter.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// API base URL, without a trailing path.
    pub base_url: String,
    /// User-Agent header; the API rejects requests without one.
    pub user_agent: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: concat!("chart-viewer/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl YahooConfig {
    /// Point the adapter at another host (e.g. a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl From<&ProviderConfig> for YahooConfig {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production() {
        let config = YahooConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.user_agent.starts_with("chart-viewer/"));
    }

    #[test]
    fn builds_from_provider_section() {
        let provider = ProviderConfig {
            base_url: "http://127.0.0.1:1234".to_string(),
            user_agent: "ua".to_string(),
            timeout_secs: 7,
        };
        let config = YahooConfig::from(&provider);
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn builder_methods() {
        let config = YahooConfig::default()
            .with_base_url("http://localhost")
            .with_timeout(Duration::from_secs(2));
        assert_eq!(config.base_url, "http://localhost");
        assert_eq!(config.timeout, Duration::from_secs(2));
    }
}
