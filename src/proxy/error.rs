//! Pipeline error type.
//!
//! Every failure between target resolution and the end of the upstream body
//! collapses into a [`ProxyError`]. The request boundary maps all variants to
//! the same 500 error page; the variants only exist for logging.

use std::time::Duration;

use thiserror::Error;

/// A failure while resolving or contacting the upstream.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The target string could not be turned into an absolute URL.
    #[error("Invalid target URL '{target}'")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },

    /// DNS, connect, TLS or protocol failure reported by the HTTP client.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// No response head arrived within the configured request timeout.
    #[error("Upstream did not respond within {0:?}")]
    Timeout(Duration),
}

impl ProxyError {
    /// Render the error and its full cause chain on one line.
    ///
    /// HTTP client errors keep the interesting part ("connection refused",
    /// "certificate has expired") in their sources, so the top-level
    /// `Display` alone is not enough for the error page.
    pub fn message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
