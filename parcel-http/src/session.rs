//! Sessions: one client and cookie jar reused across calls.

use crate::cookie::{CookieJar, default_jar};
use crate::options::{RequestOption, apply_options};
use crate::request::send_request;
use crate::{ClientConfig, HttpClient, RequestArguments, RequestBuilder, Response, Result};
use http::Method;

/// Reuses one client and cookie jar across calls.
///
/// Every call builds a fresh [`RequestArguments`] seeded with the session's
/// client, applies the per-call options on top and sends it. Cookies stored by
/// one call are sent on later calls because the jar is shared, not copied.
/// Per-call jars and redirect limits apply to that call only.
///
/// Clones share the client and jar. Concurrent use from several tasks is as
/// safe as the jar implementation; the default jar is.
#[derive(Debug, Clone)]
pub struct Session {
    client: HttpClient,
}

impl Session {
    /// Create a session with the default configuration and a fresh jar.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a session from `config` with a fresh jar.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::with_cookie_jar(config, default_jar())?,
        })
    }

    /// Create a session around an existing client and its jar.
    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// The session's client.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// The session's cookie jar.
    pub fn jar(&self) -> Option<&CookieJar> {
        self.client.jar()
    }

    /// A fresh argument bag seeded with this session's client.
    pub fn arguments(&self) -> RequestArguments {
        RequestArguments::with_client(self.client.clone())
    }

    /// Create a request builder bound to this session.
    pub fn request(&self, method: Method, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, url, self.arguments())
    }

    /// Send a request with `options` applied on top of the session.
    pub async fn send<I>(&self, method: Method, url: &str, options: I) -> Result<Response>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        let mut args = self.arguments();
        apply_options(&mut args, options);
        send_request(method, url, args).await
    }

    /// Send a GET request.
    pub async fn get<I>(&self, url: &str, options: I) -> Result<Response>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.send(Method::GET, url, options).await
    }

    /// Send a POST request.
    pub async fn post<I>(&self, url: &str, options: I) -> Result<Response>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.send(Method::POST, url, options).await
    }

    /// Send a PUT request.
    pub async fn put<I>(&self, url: &str, options: I) -> Result<Response>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.send(Method::PUT, url, options).await
    }

    /// Send a PATCH request.
    pub async fn patch<I>(&self, url: &str, options: I) -> Result<Response>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.send(Method::PATCH, url, options).await
    }

    /// Send a DELETE request.
    pub async fn delete<I>(&self, url: &str, options: I) -> Result<Response>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.send(Method::DELETE, url, options).await
    }

    /// Send a HEAD request.
    pub async fn head<I>(&self, url: &str, options: I) -> Result<Response>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.send(Method::HEAD, url, options).await
    }

    /// Send an OPTIONS request.
    pub async fn options<I>(&self, url: &str, options: I) -> Result<Response>
    where
        I: IntoIterator<Item = RequestOption>,
    {
        self.send(Method::OPTIONS, url, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{cookies, jar, redirect_limit};
    use std::sync::Arc;

    #[test]
    fn test_session_always_has_jar() {
        let config = ClientConfig::builder().cookie_store(false).build();
        let session = Session::with_config(config).unwrap();
        assert!(session.jar().is_some());
    }

    #[test]
    fn test_arguments_share_client_and_jar() {
        let session = Session::new().unwrap();
        let args = session.arguments();
        let client = args.client.as_ref().unwrap();
        assert!(Arc::ptr_eq(client.jar().unwrap(), session.jar().unwrap()));
    }

    #[test]
    fn test_per_call_overrides_leave_session_untouched() {
        let session = Session::new().unwrap();
        let call_jar = default_jar();

        let request = session
            .request(Method::GET, "http://example.com/")
            .options([jar(call_jar.clone()), redirect_limit(1)])
            .build()
            .unwrap();
        assert!(request.headers().get(http::header::COOKIE).is_none());

        assert!(!Arc::ptr_eq(session.jar().unwrap(), &call_jar));
        assert_eq!(
            session.client().redirect_limit(),
            crate::DEFAULT_REDIRECT_LIMIT
        );
    }

    #[test]
    fn test_cookie_map_lands_in_session_jar() {
        let session = Session::new().unwrap();
        let request = session
            .request(Method::GET, "http://example.com/")
            .option(cookies([("token", "abc")]))
            .build()
            .unwrap();

        assert_eq!(request.headers()[http::header::COOKIE], "token=abc");
        let url = url::Url::parse("http://example.com/").unwrap();
        let stored = crate::cookie::cookies_for(session.jar().unwrap().as_ref(), &url);
        assert_eq!(stored, vec![("token".to_string(), "abc".to_string())]);
    }
}
