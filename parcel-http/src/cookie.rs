//! Cookie jars and per-request cookie injection.

use crate::args::RequestArguments;
use crate::{ClientConfig, Error, HttpClient, Result};
use http::HeaderValue;
use reqwest::cookie::CookieStore;
use std::sync::Arc;
use tracing::trace;
use url::Url;

/// A shared, pluggable cookie store.
///
/// Any [`CookieStore`] works; [`default_jar`] returns reqwest's in-memory jar.
/// Implementations must be thread-safe when shared across concurrent calls.
pub type CookieJar = Arc<dyn CookieStore>;

/// Create an empty in-memory cookie jar.
pub fn default_jar() -> CookieJar {
    Arc::new(reqwest::cookie::Jar::default())
}

/// Adapter letting a [`CookieJar`] trait object back a reqwest client.
pub(crate) struct SharedJar(pub(crate) CookieJar);

impl CookieStore for SharedJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.0.set_cookies(cookie_headers, url)
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.0.cookies(url)
    }
}

/// Cookies `jar` would send to `url`, as name/value pairs.
pub fn cookies_for(jar: &dyn CookieStore, url: &Url) -> Vec<(String, String)> {
    jar.cookies(url)
        .and_then(|header| header.to_str().ok().map(parse_cookie_header))
        .unwrap_or_default()
}

/// Store name/value pairs in `jar` for `url`.
///
/// Nothing is stored when any pair is not a valid header value.
pub fn set_cookies_for(
    jar: &dyn CookieStore,
    url: &Url,
    cookies: &[(String, String)],
) -> Result<()> {
    let headers = cookies
        .iter()
        .map(|(name, value)| {
            HeaderValue::try_from(format!("{name}={value}"))
                .map_err(|e| Error::RequestConstruction(format!("cookie {name:?}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;
    jar.set_cookies(&mut headers.iter(), url);
    Ok(())
}

fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

fn cookie_header(cookies: &[(String, String)]) -> Result<HeaderValue> {
    let joined = cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ");
    HeaderValue::try_from(joined)
        .map_err(|e| Error::RequestConstruction(format!("cookie header: {e}")))
}

/// Reconcile the explicit jar, the cookie map and the client's jar for one call.
///
/// An explicit jar replaces the client's jar for this call only. Otherwise
/// the supplied cookies are merged with the jar's cookies for the request
/// URL, written back to the jar and attached to `request`. With neither,
/// the client's jar applies its stored cookies when the request is sent.
pub fn inject_cookies(args: &mut RequestArguments, request: &mut reqwest::Request) -> Result<()> {
    if let Some(jar) = args.jar.take() {
        trace!(url = %request.url(), "using call-scoped cookie jar");
        let client = match args.client.take() {
            Some(client) => client.scoped_jar(jar)?,
            None => HttpClient::with_cookie_jar(ClientConfig::default(), jar)?,
        };
        args.client = Some(client);
        return Ok(());
    }

    let Some(supplied) = args.cookies.as_ref() else {
        return Ok(());
    };

    let jar = args.client.as_ref().and_then(|client| client.jar());
    let mut combined = jar
        .map(|jar| cookies_for(jar.as_ref(), request.url()))
        .unwrap_or_default();
    for (name, value) in supplied {
        combined.retain(|(existing, _)| existing != name);
        combined.push((name.clone(), value.clone()));
    }
    trace!(url = %request.url(), count = combined.len(), "attaching cookies");

    if let Some(jar) = jar {
        set_cookies_for(jar.as_ref(), request.url(), &combined)?;
    }
    if !combined.is_empty() {
        request
            .headers_mut()
            .insert(http::header::COOKIE, cookie_header(&combined)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn request(url: &str) -> reqwest::Request {
        reqwest::Request::new(Method::GET, Url::parse(url).unwrap())
    }

    fn header_pairs(request: &reqwest::Request) -> Vec<(String, String)> {
        request
            .headers()
            .get(http::header::COOKIE)
            .map(|h| parse_cookie_header(h.to_str().unwrap()))
            .unwrap_or_default()
    }

    #[test]
    fn test_cookie_map_without_client() {
        let mut args = RequestArguments::new();
        args.cookies = Some(
            [("Key1", "Value1"), ("Key2", "Value2")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        let mut req = request("http://example.com/");
        inject_cookies(&mut args, &mut req).unwrap();

        assert_eq!(
            header_pairs(&req),
            vec![
                ("Key1".to_string(), "Value1".to_string()),
                ("Key2".to_string(), "Value2".to_string()),
            ]
        );
    }

    #[test]
    fn test_cookie_map_merges_with_jar() {
        let jar = default_jar();
        let url = Url::parse("http://example.com/").unwrap();
        set_cookies_for(
            jar.as_ref(),
            &url,
            &[
                ("session".to_string(), "abc".to_string()),
                ("theme".to_string(), "dark".to_string()),
            ],
        )
        .unwrap();

        let client = HttpClient::with_cookie_jar(ClientConfig::default(), jar.clone()).unwrap();
        let mut args = RequestArguments::with_client(client);
        args.cookies = Some([("theme".to_string(), "light".to_string())].into());
        let mut req = request("http://example.com/");
        inject_cookies(&mut args, &mut req).unwrap();

        let mut sent = header_pairs(&req);
        sent.sort();
        assert_eq!(
            sent,
            vec![
                ("session".to_string(), "abc".to_string()),
                ("theme".to_string(), "light".to_string()),
            ]
        );

        let mut stored = cookies_for(jar.as_ref(), &url);
        stored.sort();
        assert_eq!(stored, sent);
    }

    #[test]
    fn test_explicit_jar_scopes_client() {
        let session_jar = default_jar();
        let call_jar = default_jar();
        let client =
            HttpClient::with_cookie_jar(ClientConfig::default(), session_jar.clone()).unwrap();

        let mut args = RequestArguments::with_client(client.clone());
        args.jar = Some(call_jar.clone());
        args.cookies = Some([("ignored".to_string(), "1".to_string())].into());
        let mut req = request("http://example.com/");
        inject_cookies(&mut args, &mut req).unwrap();

        let scoped = args.client.unwrap();
        assert!(Arc::ptr_eq(scoped.jar().unwrap(), &call_jar));
        assert!(Arc::ptr_eq(client.jar().unwrap(), &session_jar));
        assert!(req.headers().get(http::header::COOKIE).is_none());
    }

    #[test]
    fn test_nothing_supplied_leaves_request_alone() {
        let mut args = RequestArguments::new();
        let mut req = request("http://example.com/");
        inject_cookies(&mut args, &mut req).unwrap();
        assert!(req.headers().is_empty());
        assert!(args.client.is_none());
    }

    #[test]
    fn test_invalid_cookie_fails_before_touching_jar() {
        let jar = default_jar();
        let url = Url::parse("http://example.com/").unwrap();
        let bad = [
            ("good".to_string(), "1".to_string()),
            ("bad".to_string(), "line\nbreak".to_string()),
        ];

        let err = set_cookies_for(jar.as_ref(), &url, &bad).unwrap_err();
        assert!(err.is_request_construction());
        assert!(cookies_for(jar.as_ref(), &url).is_empty());

        let client = HttpClient::with_cookie_jar(ClientConfig::default(), jar.clone()).unwrap();
        let mut args = RequestArguments::with_client(client);
        args.cookies = Some(bad.into_iter().collect());
        let mut req = request("http://example.com/");
        let err = inject_cookies(&mut args, &mut req).unwrap_err();
        assert!(err.is_request_construction());
        assert!(cookies_for(jar.as_ref(), &url).is_empty());
        assert!(req.headers().get(http::header::COOKIE).is_none());
    }

    #[test]
    fn test_parse_cookie_header() {
        assert_eq!(
            parse_cookie_header("a=1; b=x=y;bad; c="),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "x=y".to_string()),
                ("c".to_string(), String::new()),
            ]
        );
    }
}
