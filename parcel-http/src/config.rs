//! HTTP client configuration.

use std::time::Duration;

/// Redirect limit used when neither the config nor the request sets one.
pub const DEFAULT_REDIRECT_LIMIT: usize = 10;

/// HTTP client configuration.
///
/// Replaces process-wide defaults: every [`HttpClient`](crate::HttpClient)
/// and [`Session`](crate::Session) is built from one of these.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Default request timeout. `None` means no timeout.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// How long idle pooled connections are kept.
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Default headers for all requests.
    pub default_headers: Vec<(String, String)>,
    /// User agent string.
    pub user_agent: String,
    /// Enable gzip compression.
    pub gzip: bool,
    /// Enable brotli compression.
    pub brotli: bool,
    /// Install a default cookie jar on the client.
    pub cookie_store: bool,
    /// Maximum redirects to follow.
    pub redirect_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 32,
            default_headers: Vec::new(),
            user_agent: format!("parcel/{}", env!("CARGO_PKG_VERSION")),
            gzip: true,
            brotli: true,
            cookie_store: true,
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for HTTP client configuration.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the connection pool idle timeout.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Add a default header for all requests.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((name.into(), value.into()));
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable gzip compression.
    pub fn gzip(mut self, enable: bool) -> Self {
        self.config.gzip = enable;
        self
    }

    /// Enable or disable brotli compression.
    pub fn brotli(mut self, enable: bool) -> Self {
        self.config.brotli = enable;
        self
    }

    /// Enable or disable the default cookie jar.
    pub fn cookie_store(mut self, enable: bool) -> Self {
        self.config.cookie_store = enable;
        self
    }

    /// Set the maximum number of redirects to follow. Zero keeps the default.
    pub fn redirect_limit(mut self, limit: usize) -> Self {
        if limit > 0 {
            self.config.redirect_limit = limit;
        }
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.redirect_limit, DEFAULT_REDIRECT_LIMIT);
        assert!(config.cookie_store);
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("parcel/"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(5))
            .redirect_limit(3)
            .default_header("X-Trace", "on")
            .cookie_store(false)
            .build();

        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.redirect_limit, 3);
        assert_eq!(
            config.default_headers,
            vec![("X-Trace".to_string(), "on".to_string())]
        );
        assert!(!config.cookie_store);
    }

    #[test]
    fn test_zero_redirect_limit_keeps_default() {
        let config = ClientConfig::builder().redirect_limit(0).build();
        assert_eq!(config.redirect_limit, DEFAULT_REDIRECT_LIMIT);
    }
}
