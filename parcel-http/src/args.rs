//! The per-call argument bag collecting every request-shaping input.

use crate::{DEFAULT_REDIRECT_LIMIT, Error, HttpClient, cookie::CookieJar};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use http::{HeaderMap, HeaderValue};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::time::Duration;

/// Lazily marshaled JSON value.
pub type Marshal = Box<dyn FnOnce() -> serde_json::Result<Vec<u8>> + Send>;

/// JSON request payload.
pub enum JsonBody {
    /// Pre-encoded JSON text, sent verbatim.
    Text(String),
    /// Pre-encoded JSON bytes, sent verbatim.
    Bytes(Vec<u8>),
    /// A value marshaled when the body is encoded.
    Structured(Marshal),
}

impl JsonBody {
    /// Capture a serializable value; marshaling is deferred to body encoding.
    pub fn structured<T>(value: T) -> Self
    where
        T: serde::Serialize + Send + 'static,
    {
        JsonBody::Structured(Box::new(move || serde_json::to_vec(&value)))
    }
}

impl fmt::Debug for JsonBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonBody::Text(text) => f.debug_tuple("Text").field(text).finish(),
            JsonBody::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            JsonBody::Structured(_) => f.write_str("Structured(..)"),
        }
    }
}

/// A file attached to a multipart form.
pub struct FileField {
    /// Form field name.
    pub field_name: String,
    /// File name reported to the server.
    pub file_name: String,
    /// File content. Consumed and dropped by the body encoder.
    pub content: Box<dyn Read + Send>,
}

impl FileField {
    /// Create a file field from any readable stream.
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Read + Send + 'static,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            content: Box::new(content),
        }
    }
}

impl fmt::Debug for FileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileField")
            .field("field_name", &self.field_name)
            .field("file_name", &self.file_name)
            .finish_non_exhaustive()
    }
}

/// Basic authentication credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
}

impl BasicAuth {
    /// Create credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `Authorization` header value using the `Basic` scheme.
    pub fn header_value(&self) -> Result<HeaderValue, Error> {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        let mut value = HeaderValue::try_from(format!("Basic {encoded}"))
            .map_err(|e| Error::RequestConstruction(format!("authorization header: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Decode credentials from a `Basic` `Authorization` header value.
    ///
    /// The password is everything after the first `:`.
    pub fn from_header(value: &HeaderValue) -> Option<Self> {
        let encoded = value.to_str().ok()?.strip_prefix("Basic ")?;
        let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Self::new(username, password))
    }
}

/// Every input that can shape one outbound request.
///
/// Built fresh for each call and mutated by [`RequestOption`](crate::RequestOption)s
/// in the order they are supplied.
#[derive(Default)]
pub struct RequestArguments {
    /// Client used to send the request. A default client is created when absent.
    pub client: Option<HttpClient>,
    /// Headers applied after body encoding, so they may override the inferred content type.
    pub headers: HeaderMap,
    /// Query parameters set on the URL.
    pub params: BTreeMap<String, String>,
    /// Structured query object, consulted only when `params` is empty.
    pub object_param: Option<serde_json::Value>,
    /// Basic authentication credentials.
    pub auth: Option<BasicAuth>,
    /// Cookies for this request, used only when no explicit jar is set.
    pub cookies: Option<BTreeMap<String, String>>,
    /// Cookie jar replacing the client's jar for this call.
    pub jar: Option<CookieJar>,
    /// Raw body, sent verbatim.
    pub body: Option<reqwest::Body>,
    /// JSON body.
    pub json: Option<JsonBody>,
    /// Form fields, URL-encoded or added to a multipart form.
    pub data: Option<BTreeMap<String, String>>,
    /// Files for a multipart form.
    pub files: Option<Vec<FileField>>,
    /// Redirect cap. Zero uses the client's limit.
    pub redirect_limit: usize,
    /// Per-call timeout override.
    pub timeout: Option<Duration>,
    pub(crate) error: Option<Error>,
}

impl RequestArguments {
    /// Create an empty argument bag.
    ///
    /// The bag carries no client and a zero redirect limit; sending it creates
    /// a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bag seeded with a default client, its own jar and the
    /// default redirect limit.
    pub fn with_default_client() -> Result<Self, Error> {
        Ok(Self {
            client: Some(HttpClient::default_client()?),
            redirect_limit: DEFAULT_REDIRECT_LIMIT,
            ..Self::default()
        })
    }

    /// Create an argument bag that sends through `client`.
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client: Some(client),
            ..Self::default()
        }
    }

    /// Record an error raised while applying an option. The first one wins.
    pub(crate) fn fail(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Take the deferred option error, if any.
    pub(crate) fn take_error(&mut self) -> Option<Error> {
        self.error.take()
    }
}

impl fmt::Debug for RequestArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestArguments")
            .field("headers", &self.headers)
            .field("params", &self.params)
            .field("object_param", &self.object_param)
            .field("auth", &self.auth.as_ref().map(|a| &a.username))
            .field("cookies", &self.cookies)
            .field("jar", &self.jar.is_some())
            .field("body", &self.body.is_some())
            .field("json", &self.json)
            .field("data", &self.data)
            .field("files", &self.files)
            .field("redirect_limit", &self.redirect_limit)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
