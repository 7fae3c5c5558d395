// Parcel - composable HTTP requests for Rust
//
// Requests are described by lists of small options applied to a per-call
// argument bag, then assembled and sent through reqwest.

// Re-export the request layer
pub use parcel_http::*;

/// Prelude module for convenient imports.
///
/// ```
/// use parcel::prelude::*;
///
/// let request = new_request(
///     Method::GET,
///     "http://example.com/",
///     [options::params([("q", "rust")])],
/// )
/// .unwrap();
/// assert_eq!(request.url().as_str(), "http://example.com/?q=rust");
/// ```
pub mod prelude {
    pub use parcel_http::prelude::*;
    pub use parcel_http::{delete, get, head, patch, post, put, request};
}
