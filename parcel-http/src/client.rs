//! HTTP client implementation.

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use reqwest::Request;
use std::sync::Arc;
use tracing::debug;

use crate::cookie::{CookieJar, SharedJar, default_jar};
use crate::redirect::{self, exceeded_limit};
use crate::{ClientConfig, Error, RequestArguments, RequestBuilder, Response, Result};

/// HTTP client holding a configured transport and an optional cookie jar.
///
/// Cloning is cheap and clones share the transport and the jar.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: Arc<ClientConfig>,
    jar: Option<CookieJar>,
    redirect_limit: usize,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    ///
    /// A fresh in-memory jar is installed when `config.cookie_store` is set.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let jar = config.cookie_store.then(default_jar);
        let redirect_limit = config.redirect_limit;
        Self::build(Arc::new(config), jar, redirect_limit)
    }

    /// Create a client that stores cookies in `jar`.
    pub fn with_cookie_jar(config: ClientConfig, jar: CookieJar) -> Result<Self> {
        let redirect_limit = config.redirect_limit;
        Self::build(Arc::new(config), Some(jar), redirect_limit)
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    fn build(
        config: Arc<ClientConfig>,
        jar: Option<CookieJar>,
        redirect_limit: usize,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(config.gzip)
            .brotli(config.brotli)
            .redirect(redirect::policy(redirect_limit))
            .default_headers(default_headers(&config)?);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(jar) = &jar {
            builder = builder.cookie_provider(Arc::new(SharedJar(jar.clone())));
        }

        Ok(Self {
            inner: builder.build()?,
            config,
            jar,
            redirect_limit,
        })
    }

    /// A client for one call that uses `jar` instead of this client's jar.
    pub fn scoped_jar(&self, jar: CookieJar) -> Result<Self> {
        Self::build(self.config.clone(), Some(jar), self.redirect_limit)
    }

    /// A client for one call that follows at most `limit` redirects.
    pub fn scoped_redirect_limit(&self, limit: usize) -> Result<Self> {
        Self::build(self.config.clone(), self.jar.clone(), limit)
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The cookie jar, if the client has one.
    pub fn jar(&self) -> Option<&CookieJar> {
        self.jar.as_ref()
    }

    /// Maximum redirects this client follows.
    pub fn redirect_limit(&self) -> usize {
        self.redirect_limit
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Create a PUT request builder.
    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    /// Create a PATCH request builder.
    pub fn patch(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::PATCH, url)
    }

    /// Create a DELETE request builder.
    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    /// Create a HEAD request builder.
    pub fn head(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::HEAD, url)
    }

    /// Create a request builder with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, url, RequestArguments::with_client(self.clone()))
    }

    /// Send an assembled request.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        debug!(method = %request.method(), url = %request.url(), "Sending HTTP request");

        let response = self
            .inner
            .execute(request)
            .await
            .map_err(|e| match exceeded_limit(&e) {
                Some(limit) => Error::TooManyRedirects { limit },
                None => Error::Http(e),
            })?;

        debug!(status = %response.status(), url = %response.url(), "Received HTTP response");
        Response::from_reqwest(response).await
    }
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.default_headers {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| Error::RequestConstruction(format!("default header {name:?}: {e}")))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| Error::RequestConstruction(format!("default header {name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("jar", &self.jar.is_some())
            .field("redirect_limit", &self.redirect_limit)
            .finish()
    }
}
