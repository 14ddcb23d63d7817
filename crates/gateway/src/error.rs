// ABOUTME: Error types for the feed cache gateway.
// ABOUTME: GatewayError carries an ErrorCode with URL context; CacheError covers the store boundary.

use std::fmt;

use thiserror::Error;

/// Error codes for the user-visible gateway failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The requested URL is not an absolute http/https URL.
    InvalidUrl,
    /// The upstream fetch failed: network error, timeout, or non-2xx status.
    UpstreamUnavailable,
    /// The upstream body is not a parsable feed.
    UnparsableFeed,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::UpstreamUnavailable => "upstream unavailable",
            ErrorCode::UnparsableFeed => "unparsable feed",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for resolve operations.
///
/// Every error is scoped to a single resolve call; nothing here is fatal
/// to the process. Cache-side failures never appear — they degrade to a
/// miss (reads) or are logged and ignored (writes).
#[derive(Debug, thiserror::Error)]
pub struct GatewayError {
    pub code: ErrorCode,
    pub url: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gateway: {}: {}", self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl GatewayError {
    /// Create an InvalidUrl error.
    pub fn invalid_url(url: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::InvalidUrl,
            url: url.into(),
            source,
        }
    }

    /// Create an UpstreamUnavailable error.
    pub fn upstream(url: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::UpstreamUnavailable,
            url: url.into(),
            source,
        }
    }

    /// Create an UnparsableFeed error.
    pub fn unparsable(url: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::UnparsableFeed,
            url: url.into(),
            source,
        }
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is an UpstreamUnavailable error.
    pub fn is_upstream_unavailable(&self) -> bool {
        self.code == ErrorCode::UpstreamUnavailable
    }

    /// Returns true if this is an UnparsableFeed error.
    pub fn is_unparsable_feed(&self) -> bool {
        self.code == ErrorCode::UnparsableFeed
    }
}

/// Errors from the cache store boundary.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store could not serve the request.
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
}
