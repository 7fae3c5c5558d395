//! Bounded redirect policy.
//!
//! The client follows redirects until the configured count is exceeded and
//! then fails with [`Error::TooManyRedirects`](crate::Error::TooManyRedirects).

use crate::args::RequestArguments;
use crate::{ClientConfig, HttpClient, Result};
use thiserror::Error;
use tracing::warn;

/// Raised inside the redirect check when the limit is exceeded.
#[derive(Debug, Error)]
#[error("exceeded redirect limit of {limit}")]
pub struct RedirectLimitExceeded {
    /// The limit that was exceeded.
    pub limit: usize,
}

/// Redirect policy following at most `limit` redirects.
pub fn policy(limit: usize) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > limit {
            warn!(limit, url = %attempt.url(), "redirect limit exceeded");
            attempt.error(RedirectLimitExceeded { limit })
        } else {
            attempt.follow()
        }
    })
}

/// Ensure `args.client` enforces the bag's redirect limit.
///
/// A zero limit keeps whatever the client already enforces. A different
/// limit yields a call-scoped client; the caller's client is untouched.
pub fn install_redirect_limit(args: &mut RequestArguments) -> Result<()> {
    let limit = args.redirect_limit;
    if limit == 0 {
        return Ok(());
    }

    let client = match args.client.take() {
        Some(client) if client.redirect_limit() == limit => client,
        Some(client) => client.scoped_redirect_limit(limit)?,
        None => HttpClient::new(ClientConfig::builder().redirect_limit(limit).build())?,
    };
    args.client = Some(client);
    Ok(())
}

/// The limit carried by a redirect failure anywhere in `error`'s source chain.
pub(crate) fn exceeded_limit(error: &reqwest::Error) -> Option<usize> {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(err) = source {
        if let Some(exceeded) = err.downcast_ref::<RedirectLimitExceeded>() {
            return Some(exceeded.limit);
        }
        source = err.source();
    }
    None
}
