//! HTTP client error types.

use std::fmt;
use thiserror::Error;

/// Result type for request construction and execution.
pub type Result<T> = std::result::Result<T, Error>;

/// Step of request assembly in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Applying request options (deferred option errors).
    Options,
    /// Merging query parameters into the URL.
    Url,
    /// Encoding the request body.
    Body,
    /// Building the transport-level request.
    Construct,
    /// Injecting cookies into the jar and request.
    Cookies,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Options => "options",
            Stage::Url => "url merge",
            Stage::Body => "body encoding",
            Stage::Construct => "request construction",
            Stage::Cookies => "cookie injection",
        };
        f.write_str(name)
    }
}

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Request assembly failed; wraps the underlying error with the stage it failed in.
    #[error("failed to prepare request during {stage}: {source}")]
    Prepare {
        /// Assembly stage.
        stage: Stage,
        /// Underlying error.
        #[source]
        source: Box<Error>,
    },

    /// The URL or its query string could not be parsed.
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    /// JSON marshaling, form encoding or multipart part failure.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Reading, copying or opening a body stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The method, URL or a header was rejected while building the request.
    #[error("Failed to build request: {0}")]
    RequestConstruction(String),

    /// The redirect cap was exceeded while executing the request.
    #[error("Stopped after {limit} redirects")]
    TooManyRedirects {
        /// Configured redirect limit.
        limit: usize,
    },

    /// Response error.
    #[error("Response error: {status} - {message}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Response body could not be decoded as text or JSON.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Wrap this error with the assembly stage it occurred in.
    pub(crate) fn at(self, stage: Stage) -> Self {
        Error::Prepare {
            stage,
            source: Box::new(self),
        }
    }

    /// The error with any stage context removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Prepare { source, .. } => source.root(),
            other => other,
        }
    }

    /// The assembly stage this error was raised in, if it came from request assembly.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Prepare { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Check if the URL or query string was malformed.
    pub fn is_malformed_url(&self) -> bool {
        matches!(self.root(), Error::MalformedUrl(_))
    }

    /// Check if a body encoder failed.
    pub fn is_encoding(&self) -> bool {
        matches!(self.root(), Error::Encoding(_))
    }

    /// Check if a stream read or file access failed.
    pub fn is_io(&self) -> bool {
        matches!(self.root(), Error::Io(_))
    }

    /// Check if the transport request could not be built.
    pub fn is_request_construction(&self) -> bool {
        matches!(self.root(), Error::RequestConstruction(_))
    }

    /// Check if the redirect cap was exceeded.
    pub fn is_too_many_redirects(&self) -> bool {
        matches!(self.root(), Error::TooManyRedirects { .. })
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self.root(), Error::Http(e) if e.is_timeout())
    }

    /// Get the HTTP status code if this is a response error.
    pub fn status_code(&self) -> Option<u16> {
        match self.root() {
            Error::Response { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
