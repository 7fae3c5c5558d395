//! Composable request options.
//!
//! Each function returns a [`RequestOption`] that applies one concern to a
//! [`RequestArguments`] bag. Options are applied left to right. Map-valued
//! options (headers, params, cookies, data) merge into what earlier options
//! set, overwriting colliding keys; everything else is last-write-wins.
//!
//! ```
//! use parcel_http::options::{auth, data, params};
//! use parcel_http::{Method, new_request};
//!
//! let request = new_request(
//!     Method::POST,
//!     "http://example.com/submit",
//!     [params([("page", "2")]), auth("user", "pass"), data([("a", "1")])],
//! )
//! .unwrap();
//! assert_eq!(request.url().as_str(), "http://example.com/submit?page=2");
//! ```

use crate::args::{BasicAuth, FileField, JsonBody, RequestArguments};
use crate::cookie::CookieJar;
use crate::{Error, HttpClient};
use http::{HeaderName, HeaderValue};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// A single mutation of a [`RequestArguments`] bag.
pub struct RequestOption(Box<dyn FnOnce(&mut RequestArguments) + Send>);

impl RequestOption {
    /// Wrap a custom mutation.
    pub fn new<F>(apply: F) -> Self
    where
        F: FnOnce(&mut RequestArguments) + Send + 'static,
    {
        Self(Box::new(apply))
    }

    /// Apply this option to `args`.
    pub fn apply(self, args: &mut RequestArguments) {
        (self.0)(args)
    }
}

impl fmt::Debug for RequestOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestOption")
    }
}

/// Apply `options` to `args` in order.
pub fn apply_options<I>(args: &mut RequestArguments, options: I)
where
    I: IntoIterator<Item = RequestOption>,
{
    for option in options {
        option.apply(args);
    }
}

fn collect_pairs<I, K, V>(pairs: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Merge headers into the request. Names are case-insensitive.
pub fn headers<I, K, V>(headers: I) -> RequestOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let pairs = collect_pairs(headers);
    RequestOption::new(move |args| {
        for (name, value) in pairs {
            let name = match HeaderName::try_from(name.as_str()) {
                Ok(name) => name,
                Err(e) => {
                    args.fail(Error::RequestConstruction(format!(
                        "invalid header name {name:?}: {e}"
                    )));
                    continue;
                }
            };
            match HeaderValue::try_from(value.as_str()) {
                Ok(value) => {
                    args.headers.insert(name, value);
                }
                Err(e) => args.fail(Error::RequestConstruction(format!(
                    "invalid value for header {name}: {e}"
                ))),
            }
        }
    })
}

/// Set a single header.
pub fn header(name: impl Into<String>, value: impl Into<String>) -> RequestOption {
    headers([(name.into(), value.into())])
}

/// Merge query parameters, each overwriting any existing value for its key.
pub fn params<I, K, V>(params: I) -> RequestOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let pairs = collect_pairs(params);
    RequestOption::new(move |args| args.params.extend(pairs))
}

/// Add query parameters from a serializable struct or map.
///
/// Sequence fields produce one parameter per element. Ignored when
/// [`params`] also supplied parameters.
pub fn query_object<T>(object: &T) -> RequestOption
where
    T: serde::Serialize + ?Sized,
{
    let value = serde_json::to_value(object);
    RequestOption::new(move |args| match value {
        Ok(value) => args.object_param = Some(value),
        Err(e) => args.fail(Error::Encoding(format!("query object: {e}"))),
    })
}

/// Set basic authentication credentials.
pub fn auth(username: impl Into<String>, password: impl Into<String>) -> RequestOption {
    let credentials = BasicAuth {
        username: username.into(),
        password: password.into(),
    };
    RequestOption::new(move |args| args.auth = Some(credentials))
}

/// Merge cookies sent with this request. Ignored when [`jar`] is also set.
pub fn cookies<I, K, V>(cookies: I) -> RequestOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let pairs = collect_pairs(cookies);
    RequestOption::new(move |args| args.cookies.get_or_insert_with(Default::default).extend(pairs))
}

/// Use `jar` instead of the client's cookie jar for this call.
pub fn jar(jar: CookieJar) -> RequestOption {
    RequestOption::new(move |args| args.jar = Some(jar))
}

/// Send the request through `client`.
pub fn client(client: HttpClient) -> RequestOption {
    RequestOption::new(move |args| args.client = Some(client))
}

/// Send `body` verbatim. Takes precedence over every other body option.
pub fn body(body: impl Into<reqwest::Body>) -> RequestOption {
    let body = body.into();
    RequestOption::new(move |args| args.body = Some(body))
}

/// Read the file at `path` and send its bytes as the body.
pub fn file_content(path: impl AsRef<Path>) -> RequestOption {
    let content = std::fs::read(path.as_ref());
    RequestOption::new(move |args| match content {
        Ok(bytes) => args.body = Some(bytes.into()),
        Err(e) => args.fail(Error::Io(e)),
    })
}

/// Send `value` serialized as JSON.
pub fn json<T>(value: T) -> RequestOption
where
    T: serde::Serialize + Send + 'static,
{
    let json = JsonBody::structured(value);
    RequestOption::new(move |args| args.json = Some(json))
}

/// Send pre-encoded JSON text verbatim.
pub fn json_text(text: impl Into<String>) -> RequestOption {
    let json = JsonBody::Text(text.into());
    RequestOption::new(move |args| args.json = Some(json))
}

/// Send pre-encoded JSON bytes verbatim.
pub fn json_bytes(bytes: impl Into<Vec<u8>>) -> RequestOption {
    let json = JsonBody::Bytes(bytes.into());
    RequestOption::new(move |args| args.json = Some(json))
}

/// Merge form fields.
///
/// Sent URL-encoded, or as plain fields of the multipart form when files are attached.
pub fn data<I, K, V>(data: I) -> RequestOption
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let pairs = collect_pairs(data);
    RequestOption::new(move |args| args.data.get_or_insert_with(Default::default).extend(pairs))
}

/// Attach files to a multipart form. Repeated calls accumulate.
pub fn files<I>(files: I) -> RequestOption
where
    I: IntoIterator<Item = FileField>,
{
    let files: Vec<FileField> = files.into_iter().collect();
    RequestOption::new(move |args| args.files.get_or_insert_with(Vec::new).extend(files))
}

/// Open the file at `path` and attach it under `field_name`.
pub fn file(field_name: impl Into<String>, path: impl AsRef<Path>) -> RequestOption {
    let field_name = field_name.into();
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let opened = File::open(path);
    RequestOption::new(move |args| match opened {
        Ok(content) => args
            .files
            .get_or_insert_with(Vec::new)
            .push(FileField::new(field_name, file_name, content)),
        Err(e) => args.fail(Error::Io(e)),
    })
}

/// Override the timeout for this call. A zero duration keeps the client's timeout.
pub fn timeout(timeout: Duration) -> RequestOption {
    RequestOption::new(move |args| {
        args.timeout = (!timeout.is_zero()).then_some(timeout);
    })
}

/// Cap the number of redirects followed. Zero keeps the client's limit.
pub fn redirect_limit(limit: usize) -> RequestOption {
    RequestOption::new(move |args| args.redirect_limit = limit)
}
