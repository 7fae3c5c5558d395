//! Request assembly and the fluent request builder.

use crate::args::{BasicAuth, FileField, RequestArguments};
use crate::body::encode_body;
use crate::cookie::{CookieJar, inject_cookies};
use crate::error::Stage;
use crate::options::{self, RequestOption, apply_options};
use crate::query::{merge_object, merge_params};
use crate::redirect::install_redirect_limit;
use crate::{Error, HttpClient, Response, Result};
use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Method};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::trace;
use url::Url;

/// Assemble the outbound request for `method` and `url` from `args`.
///
/// Steps run in a fixed order: query merge, body encoding, request
/// construction, basic auth, headers, cookies. Headers therefore override
/// both the inferred `Content-Type` and the auth header. Failures are wrapped
/// with the [`Stage`] they occurred in and no partial request is returned.
///
/// Sources consumed by the body encoder and an explicit jar are taken out of
/// `args`; an explicit jar leaves a call-scoped client in `args.client`.
pub fn prepare_request<M>(
    method: M,
    url: &str,
    args: &mut RequestArguments,
) -> Result<reqwest::Request>
where
    Method: TryFrom<M>,
    <Method as TryFrom<M>>::Error: Into<http::Error>,
{
    if let Some(err) = args.take_error() {
        return Err(err.at(Stage::Options));
    }

    let url = if !args.params.is_empty() {
        merge_params(url, &args.params).map_err(|e| e.at(Stage::Url))?
    } else if let Some(object) = &args.object_param {
        merge_object(url, object).map_err(|e| e.at(Stage::Url))?
    } else {
        url.to_string()
    };

    let encoded = encode_body(args).map_err(|e| e.at(Stage::Body))?;

    let method = Method::try_from(method).map_err(|e| {
        let e: http::Error = e.into();
        Error::RequestConstruction(format!("invalid method: {e}")).at(Stage::Construct)
    })?;
    let parsed = Url::parse(&url).map_err(|e| {
        Error::RequestConstruction(format!("invalid URL {url:?}: {e}")).at(Stage::Construct)
    })?;
    trace!(%method, url = %parsed, "assembling request");

    let mut request = reqwest::Request::new(method, parsed);
    let content_length = encoded.content_length();
    if let Some(content_type) = encoded.content_type {
        request.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    if let Some(length) = content_length {
        request
            .headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from(length));
    }
    *request.body_mut() = encoded.body;
    *request.timeout_mut() = args.timeout;

    if let Some(auth) = &args.auth {
        let value = auth.header_value().map_err(|e| e.at(Stage::Construct))?;
        request.headers_mut().insert(AUTHORIZATION, value);
    }

    for (name, value) in &args.headers {
        request.headers_mut().insert(name.clone(), value.clone());
    }

    inject_cookies(args, &mut request).map_err(|e| e.at(Stage::Cookies))?;

    Ok(request)
}

/// Build a request from `options` without sending it.
///
/// ```
/// use parcel_http::options::{auth, header};
/// use parcel_http::{BasicAuth, Method, new_request};
///
/// let request = new_request(
///     Method::GET,
///     "http://example.com/",
///     [auth("Aladdin", "open sesame"), header("Accept", "text/plain")],
/// )
/// .unwrap();
///
/// let credentials = BasicAuth::from_header(&request.headers()["authorization"]).unwrap();
/// assert_eq!(credentials.username, "Aladdin");
/// assert_eq!(request.headers()["accept"], "text/plain");
/// ```
pub fn new_request<M, I>(method: M, url: &str, options: I) -> Result<reqwest::Request>
where
    Method: TryFrom<M>,
    <Method as TryFrom<M>>::Error: Into<http::Error>,
    I: IntoIterator<Item = RequestOption>,
{
    let mut args = RequestArguments::new();
    apply_options(&mut args, options);
    prepare_request(method, url, &mut args)
}

/// Assemble a request from `args` and send it.
///
/// A default client is created when `args` carries none, and the bag's
/// redirect limit is installed before assembly.
pub async fn send_request<M>(
    method: M,
    url: &str,
    mut args: RequestArguments,
) -> Result<Response>
where
    Method: TryFrom<M>,
    <Method as TryFrom<M>>::Error: Into<http::Error>,
{
    if args.client.is_none() {
        let client = HttpClient::default_client().map_err(|e| e.at(Stage::Construct))?;
        args.client = Some(client);
    }
    install_redirect_limit(&mut args).map_err(|e| e.at(Stage::Construct))?;

    let request = prepare_request(method, url, &mut args)?;
    let client = args.client.ok_or_else(|| {
        Error::RequestConstruction("no client to send the request".to_string())
            .at(Stage::Construct)
    })?;
    client.execute(request).await
}

/// HTTP request builder.
///
/// Every method applies the matching function from [`options`] to the
/// builder's argument bag, so the builder and option lists compose freely.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    args: RequestArguments,
}

impl RequestBuilder {
    /// Create a new request builder around an argument bag.
    pub fn new(method: Method, url: impl Into<String>, args: RequestArguments) -> Self {
        Self {
            method,
            url: url.into(),
            args,
        }
    }

    /// Apply an arbitrary option.
    pub fn option(mut self, option: RequestOption) -> Self {
        option.apply(&mut self.args);
        self
    }

    /// Apply several options in order.
    pub fn options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = RequestOption>,
    {
        apply_options(&mut self.args, options);
        self
    }

    /// Add a header to the request.
    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.option(options::header(name, value))
    }

    /// Add multiple headers to the request.
    pub fn headers<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.option(options::headers(headers))
    }

    /// Set a query parameter.
    pub fn query(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.option(options::params([(key.into(), value.into())]))
    }

    /// Set multiple query parameters.
    pub fn queries<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.option(options::params(params))
    }

    /// Add query parameters from a serializable struct or map.
    pub fn query_object<T: Serialize + ?Sized>(self, object: &T) -> Self {
        self.option(options::query_object(object))
    }

    /// Set the request body verbatim.
    pub fn body(self, body: impl Into<reqwest::Body>) -> Self {
        self.option(options::body(body))
    }

    /// Use the contents of the file at `path` as the body.
    pub fn file_content(self, path: impl AsRef<Path>) -> Self {
        self.option(options::file_content(path))
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize + Send + 'static>(self, json: T) -> Self {
        self.option(options::json(json))
    }

    /// Set the request body as form data.
    pub fn form<I, K, V>(self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.option(options::data(data))
    }

    /// Attach a file to a multipart body.
    pub fn file(self, file: FileField) -> Self {
        self.option(options::files([file]))
    }

    /// Set basic authentication.
    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.option(options::auth(username, password))
    }

    /// Set cookies for this request.
    pub fn cookies<I, K, V>(self, cookies: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.option(options::cookies(cookies))
    }

    /// Use `jar` for this request instead of the client's jar.
    pub fn jar(self, jar: CookieJar) -> Self {
        self.option(options::jar(jar))
    }

    /// Set a custom timeout for this request.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.option(options::timeout(timeout))
    }

    /// Cap the redirects followed by this request.
    pub fn redirect_limit(self, limit: usize) -> Self {
        self.option(options::redirect_limit(limit))
    }

    /// The argument bag collected so far.
    pub fn arguments(&self) -> &RequestArguments {
        &self.args
    }

    /// Assemble the request without sending it.
    pub fn build(mut self) -> Result<reqwest::Request> {
        prepare_request(self.method, &self.url, &mut self.args)
    }

    /// Send the request.
    pub async fn send(self) -> Result<Response> {
        send_request(self.method, &self.url, self.args).await
    }
}

/// Decode basic auth credentials from an assembled request.
pub fn basic_auth_of(request: &reqwest::Request) -> Option<BasicAuth> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(BasicAuth::from_header)
}
