//! Configuration for the Pylon knowledge base MCP server.

use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Pylon API.
    pub const BASE_URL: &str = "https://api.usepylon.com/";

    /// Public site where knowledge base articles are published.
    pub const ARTICLE_BASE_URL: &str = "https://knowledge.amplemarket.com/articles";

    /// Amplemarket knowledge base ID.
    pub const KNOWLEDGE_BASE_ID: &str = "be7fc09d-d151-4ccf-bec6-b8237af8041b";

    /// Environment variable holding the bearer token.
    pub const TOKEN_ENV: &str = "PYLON_API_TOKEN";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Cache TTL (60 seconds).
    pub const CACHE_TTL: Duration = Duration::from_secs(60);

    /// Page size requested from the article list endpoint.
    pub const PAGE_SIZE: u32 = 999;

    /// Walks stop once more than this many articles have been collected.
    pub const MAX_ARTICLES: usize = 10_000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Server configuration.
#[derive(Clone)]
pub struct Config {
    /// Pylon API bearer token.
    pub api_token: String,

    /// Base URL for the Pylon API (for testing with mock servers).
    pub api_base_url: Url,

    /// Knowledge base every lookup runs against.
    pub knowledge_base_id: String,

    /// Prefix for public article URLs.
    pub article_base_url: String,

    /// Request timeout; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Page size for article list requests.
    pub page_size: u32,

    /// Safety cap for pagination walks.
    pub max_articles: usize,
}

impl Config {
    /// Create a new configuration for the given bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] if the token is blank.
    pub fn new(api_token: impl Into<String>) -> Result<Self, ConfigError> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(ConfigError::MissingCredential { var: api::TOKEN_ENV });
        }

        Ok(Self {
            api_token,
            api_base_url: parse_base_url(api::BASE_URL, "api_base_url")?,
            knowledge_base_id: api::KNOWLEDGE_BASE_ID.to_string(),
            article_base_url: api::ARTICLE_BASE_URL.to_string(),
            request_timeout: Some(api::REQUEST_TIMEOUT),
            connect_timeout: api::CONNECT_TIMEOUT,
            cache_ttl: api::CACHE_TTL,
            page_size: api::PAGE_SIZE,
            max_articles: api::MAX_ARTICLES,
        })
    }

    /// Create a test configuration pointing at a mock server.
    ///
    /// Caching stays enabled so tests can observe hits and misses.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_token: "test-token".to_string(),
            api_base_url: Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
                .expect("mock server URL is valid"),
            knowledge_base_id: "test-kb".to_string(),
            article_base_url: api::ARTICLE_BASE_URL.to_string(),
            request_timeout: Some(Duration::from_secs(5)),
            connect_timeout: Duration::from_secs(2),
            cache_ttl: api::CACHE_TTL,
            page_size: api::PAGE_SIZE,
            max_articles: api::MAX_ARTICLES,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if `PYLON_API_TOKEN` is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var(api::TOKEN_ENV).unwrap_or_default();
        Self::new(token)
    }

    /// Override the Pylon API base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the URL does not parse.
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base_url(url, "api_base_url")?;
        Ok(self)
    }

    /// Override the knowledge base ID.
    #[must_use]
    pub fn with_knowledge_base_id(mut self, id: impl Into<String>) -> Self {
        self.knowledge_base_id = id.into();
        self
    }

    /// Override the cache TTL.
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Override the request timeout. `None` disables it.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Base URLs need a trailing slash so relative endpoints join underneath them.
fn parse_base_url(raw: &str, field: &'static str) -> Result<Url, ConfigError> {
    let normalized = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl { field, source })
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("knowledge_base_id", &self.knowledge_base_id)
            .field("request_timeout", &self.request_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}
