//! Pylon API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Bearer token authentication on every request
//! - Explicit request and connect timeouts
//! - Cursor pagination over knowledge base articles (see [`pagination`])

pub mod pagination;

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{ArticlePage, CollectionResponse};

/// Pylon API client.
#[derive(Clone)]
pub struct PylonClient {
    /// HTTP client with default auth headers.
    client: Client,

    /// API base URL, always ending in `/`.
    base_url: Url,

    /// Request timeout, reported back on timeout errors.
    request_timeout: Option<Duration>,

    /// Page size for article list requests.
    page_size: u32,

    /// Safety cap for pagination walks.
    max_articles: usize,
}

impl PylonClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let mut auth: reqwest::header::HeaderValue =
            format!("Bearer {}", config.api_token).parse()?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let mut builder = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true);

        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.api_base_url.clone(),
            request_timeout: config.request_timeout,
            page_size: config.page_size,
            max_articles: config.max_articles,
        })
    }

    /// API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get collection metadata.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn get_collection(&self, collection_id: &str) -> ClientResult<CollectionResponse> {
        self.get(&["collections", collection_id], &[]).await
    }

    /// Fetch one page of a knowledge base's articles.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn list_articles_page(
        &self,
        knowledge_base_id: &str,
        cursor: Option<&str>,
    ) -> ClientResult<ArticlePage> {
        let mut params = vec![("limit".to_string(), self.page_size.to_string())];
        if let Some(c) = cursor {
            params.push(("cursor".to_string(), c.to_string()));
        }

        self.get(&["knowledge-bases", knowledge_base_id, "articles"], &params).await
    }

    /// Resolve path segments against the base URL, percent-encoding each one.
    fn endpoint_url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Endpoint { endpoint: segments.join("/") })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request.
    async fn get<T>(&self, segments: &[&str], params: &[(String, String)]) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.endpoint_url(segments)?;

        tracing::debug!(url = %url, params = params.len(), "Pylon API request");

        let url_for_log = url.clone();
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %url_for_log, "Pylon API returned error status");
            return Err(ClientError::upstream(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(|e| self.map_transport(e))?;
        serde_json::from_slice(&bytes).map_err(ClientError::from)
    }

    fn map_transport(&self, err: reqwest::Error) -> ClientError {
        match self.request_timeout {
            Some(timeout) if err.is_timeout() => ClientError::Timeout(timeout),
            _ => ClientError::Http(err),
        }
    }
}

impl std::fmt::Debug for PylonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PylonClient").field("base_url", &self.base_url.as_str()).finish()
    }
}
