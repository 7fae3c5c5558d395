//! HTTP response wrapper.

use crate::{Error, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP response with its body fully read.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: url::Url,
}

impl Response {
    /// Create a response from a reqwest response, reading the whole body.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response.bytes().await?;

        Ok(Self {
            status,
            headers,
            body,
            url,
        })
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Check if the response was successful (2xx).
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Check if the response was a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Check if the response was a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Final URL after redirects.
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Get the response body as bytes.
    pub fn content(&self) -> &Bytes {
        &self.body
    }

    /// Get the response body as bytes, sharing the buffer.
    pub fn bytes(&self) -> Bytes {
        self.body.clone()
    }

    /// Consume the response and return the body as bytes.
    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Name/value pairs of the cookies set by this response.
    pub fn cookies(&self) -> Vec<(String, String)> {
        self.headers
            .get_all(http::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| {
                let pair = v.split(';').next()?;
                let (name, value) = pair.split_once('=')?;
                Some((name.trim().to_string(), value.trim().to_string()))
            })
            .collect()
    }

    /// Turn a 4xx or 5xx response into an error.
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_client_error() || self.status.is_server_error() {
            let message = self.text().unwrap_or_else(|_| "Unknown error".to_string());
            Err(Error::Response {
                status: self.status.as_u16(),
                message,
            })
        } else {
            Ok(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, headers: &[(&str, &str)], body: &'static [u8]) -> Response {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(
                http::HeaderName::try_from(*name).unwrap(),
                http::HeaderValue::try_from(*value).unwrap(),
            );
        }
        Response {
            status: StatusCode::from_u16(status).unwrap(),
            headers: map,
            body: Bytes::from_static(body),
            url: url::Url::parse("http://example.com/").unwrap(),
        }
    }

    #[test]
    fn test_text_matches_content() {
        let resp = response(200, &[], b"hello");
        assert!(resp.ok());
        assert_eq!(resp.text().unwrap().as_bytes(), resp.content().as_ref());
    }

    #[test]
    fn test_json_and_decode_error() {
        let resp = response(200, &[], br#"{"cookies":{"a":"1"}}"#);
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["cookies"]["a"], "1");

        let resp = response(200, &[], b"\xff\xfe");
        assert!(matches!(resp.text(), Err(Error::Decode(_))));
    }

    #[test]
    fn test_cookies_from_set_cookie() {
        let resp = response(
            200,
            &[
                ("set-cookie", "sessioncookie=123456789; Path=/"),
                ("set-cookie", "theme=dark"),
            ],
            b"",
        );
        assert_eq!(
            resp.cookies(),
            vec![
                ("sessioncookie".to_string(), "123456789".to_string()),
                ("theme".to_string(), "dark".to_string()),
            ]
        );
    }

    #[test]
    fn test_error_for_status() {
        let err = response(503, &[], b"down").error_for_status().unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(response(204, &[], b"").error_for_status().is_ok());
    }
}
