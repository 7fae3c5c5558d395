//! Integration tests for common Parcel workflows.
//!
//! These tests verify that the most common use cases work correctly.

use parcel::options::{self, auth, cookies, data, header, json, params, query_object};
use parcel::prelude::*;
use serde::Serialize;
use wiremock::matchers::{body_string, header as header_is, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Request Assembly Tests
// =============================================================================

#[test]
fn test_assembled_request_combines_options() {
    let request = new_request(
        Method::POST,
        "http://example.com/search?lang=en#results",
        [
            params([("q", "parcel")]),
            auth("user", "pass"),
            data([("page", "1")]),
            header("Accept", "text/html"),
        ],
    )
    .unwrap();

    assert_eq!(
        request.url().as_str(),
        "http://example.com/search?lang=en&q=parcel#results"
    );
    assert_eq!(
        parcel::basic_auth_of(&request),
        Some(BasicAuth::new("user", "pass"))
    );
    assert_eq!(
        request.headers()[parcel::header::CONTENT_TYPE],
        "application/x-www-form-urlencoded"
    );
    assert_eq!(request.headers()[parcel::header::ACCEPT], "text/html");
    assert_eq!(request.body().and_then(|b| b.as_bytes()), Some(&b"page=1"[..]));
}

#[test]
fn test_query_object_repeats_array_values() {
    #[derive(Serialize)]
    struct Filter {
        tag: Vec<&'static str>,
        limit: u32,
        cursor: Option<String>,
    }

    let request = new_request(
        Method::GET,
        "http://example.com/items",
        [query_object(&Filter {
            tag: vec!["a", "b"],
            limit: 10,
            cursor: None,
        })],
    )
    .unwrap();

    assert_eq!(request.url().query(), Some("limit=10&tag=a&tag=b"));
}

#[test]
fn test_later_options_override_earlier_ones() {
    let request = new_request(
        Method::PUT,
        "http://example.com/",
        [
            json(serde_json::json!({"first": true})),
            json(serde_json::json!({"second": true})),
            header("X-Trace", "1"),
            header("x-trace", "2"),
        ],
    )
    .unwrap();

    assert_eq!(
        request.body().and_then(|b| b.as_bytes()),
        Some(&br#"{"second":true}"#[..])
    );
    assert_eq!(request.headers()["x-trace"], "2");
}

#[test]
fn test_failed_option_reports_stage() {
    let err = new_request(
        Method::POST,
        "http://example.com/",
        [options::file("upload", "/definitely/not/here.txt")],
    )
    .unwrap_err();

    assert!(err.is_io());
    assert_eq!(err.stage(), Some(parcel::Stage::Options));
}

// =============================================================================
// Session Tests
// =============================================================================

#[tokio::test]
async fn test_session_login_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string("password=secret&user=me"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "sid=abc; Path=/"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .and(query_param("full", "1"))
        .and(header_is("cookie", "sid=abc; theme=dark"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"user": "me"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = Session::new().unwrap();
    session
        .post(
            &format!("{}/login", server.uri()),
            [data([("user", "me"), ("password", "secret")])],
        )
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let profile: serde_json::Value = session
        .get(
            &format!("{}/profile", server.uri()),
            [params([("full", "1")]), cookies([("theme", "dark")])],
        )
        .await
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(profile["user"], "me");
}

#[tokio::test]
async fn test_builder_on_shared_client() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/items/1"))
        .and(header_is("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("patched"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder().user_agent("parcel-tests").build();
    let client = HttpClient::new(config).unwrap();
    let response = client
        .patch(format!("{}/items/1", server.uri()))
        .json(serde_json::json!({"name": "new"}))
        .send()
        .await
        .unwrap();

    assert!(response.ok());
    assert_eq!(response.text().unwrap(), "patched");
}
