// ABOUTME: Error types for feed parsing operations.
// ABOUTME: Provides FeedError with Parse and Empty variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur during feed parsing.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Failed to parse the feed data (malformed XML/Atom/JSON).
    #[error("failed to parse feed: {0}")]
    Parse(String),

    /// The feed body was empty.
    #[error("feed body is empty")]
    Empty,
}

impl FeedError {
    /// Creates a Parse error from an underlying feed-rs error.
    pub fn parse(err: impl fmt::Display) -> Self {
        FeedError::Parse(err.to_string())
    }
}
