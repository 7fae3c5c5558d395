//! One-shot request functions.
//!
//! Each call seeds a fresh [`RequestArguments`] with a default client and jar,
//! applies its options on top and sends it.

use crate::options::{RequestOption, apply_options};
use crate::request::send_request;
use crate::{RequestArguments, Response, Result, Stage};
use http::Method;

/// Send a request with a method given as a [`Method`] or a string.
pub async fn request<M, I>(method: M, url: &str, options: I) -> Result<Response>
where
    Method: TryFrom<M>,
    <Method as TryFrom<M>>::Error: Into<http::Error>,
    I: IntoIterator<Item = RequestOption>,
{
    let mut args =
        RequestArguments::with_default_client().map_err(|e| e.at(Stage::Construct))?;
    apply_options(&mut args, options);
    send_request(method, url, args).await
}

/// Send a GET request.
pub async fn get<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    request(Method::GET, url, options).await
}

/// Send a POST request.
pub async fn post<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    request(Method::POST, url, options).await
}

/// Send a PUT request.
pub async fn put<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    request(Method::PUT, url, options).await
}

/// Send a PATCH request.
pub async fn patch<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    request(Method::PATCH, url, options).await
}

/// Send a DELETE request.
pub async fn delete<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    request(Method::DELETE, url, options).await
}

/// Send a HEAD request.
pub async fn head<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    request(Method::HEAD, url, options).await
}

/// Send an OPTIONS request.
pub async fn options<I>(url: &str, options: I) -> Result<Response>
where
    I: IntoIterator<Item = RequestOption>,
{
    request(Method::OPTIONS, url, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{header, params};

    #[test]
    fn test_option_error_fails_before_sending() {
        let err = tokio_test::block_on(get("http://example.invalid/", [header("bad name", "v")]))
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Options));
        assert!(err.is_request_construction());
    }

    #[test]
    fn test_malformed_url_fails_before_sending() {
        let err = tokio_test::block_on(post("not a url", [params([("a", "1")])])).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Url));
        assert!(err.is_malformed_url());
    }

    #[test]
    fn test_invalid_method_string() {
        let err = tokio_test::block_on(request(
            "NOT VALID",
            "http://example.invalid/",
            Vec::<RequestOption>::new(),
        ))
        .unwrap_err();
        assert!(err.is_request_construction());
    }
}
