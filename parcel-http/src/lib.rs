//! # Parcel HTTP
//!
//! Request assembly for HTTP clients built from small composable options.
//!
//! A call collects its inputs in a [`RequestArguments`] bag, mutated by a list
//! of [`RequestOption`]s, and the assembler turns the bag into a request:
//! query merge, body encoding, construction, basic auth, headers and cookies,
//! in that order.
//!
//! ## Features
//!
//! - **Options**: headers, query params, query objects, auth, cookies, jars, timeouts
//! - **Bodies**: raw, JSON, URL-encoded forms and multipart uploads
//! - **Sessions**: one client and cookie jar reused across calls
//! - **Redirects**: bounded per client or per call
//! - **Compression**: Automatic gzip/brotli support
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parcel_http::options::{header, params};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let response = parcel_http::get(
//!         "https://api.example.com/users",
//!         [params([("page", "2")]), header("Accept", "application/json")],
//!     )
//!     .await?;
//!
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Sessions
//!
//! ```rust,no_run
//! use parcel_http::Session;
//! use parcel_http::options::{data, json};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::new()?;
//!
//!     // Cookies set by the login response are sent on the next call
//!     session
//!         .post("https://api.example.com/login", [data([("user", "me")])])
//!         .await?;
//!     let response = session
//!         .post(
//!             "https://api.example.com/orders",
//!             [json(serde_json::json!({"item": "widget", "quantity": 5}))],
//!         )
//!         .await?;
//!
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```

mod api;
mod args;
pub mod body;
mod client;
mod config;
pub mod cookie;
mod error;
pub mod options;
pub mod query;
pub mod redirect;
mod request;
mod response;
mod session;

pub use api::{delete, get, head, options, patch, post, put, request};
pub use args::{BasicAuth, FileField, JsonBody, Marshal, RequestArguments};
pub use client::HttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_REDIRECT_LIMIT};
pub use cookie::{CookieJar, default_jar};
pub use error::{Error, Result, Stage};
pub use options::RequestOption;
pub use request::{RequestBuilder, basic_auth_of, new_request, prepare_request, send_request};
pub use response::Response;
pub use session::Session;

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use parcel_http::prelude::*;
/// ```
pub mod prelude {
    pub use crate::args::{BasicAuth, FileField, RequestArguments};
    pub use crate::client::HttpClient;
    pub use crate::config::{ClientConfig, ClientConfigBuilder};
    pub use crate::cookie::{CookieJar, default_jar};
    pub use crate::error::{Error, Result};
    pub use crate::options::{self, RequestOption};
    pub use crate::request::{RequestBuilder, new_request};
    pub use crate::response::Response;
    pub use crate::session::Session;
    pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
}
