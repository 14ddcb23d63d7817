// ABOUTME: Presentation-facing query wrapper over the gateway.
// ABOUTME: Skips work on empty or disabled input and folds the outcome into a tri-state.

use podcal_feed::Feed;

use crate::gateway::Gateway;

/// Outcome of a presentation-layer feed query.
///
/// The "loading" leg of the tri-state is the in-flight future itself;
/// once [`resolve_query`] returns, the query is settled.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    /// Nothing to do: empty input or the query is disabled.
    Idle,
    /// The feed resolved successfully.
    Success(Feed),
    /// The resolve failed; the message is suitable for inline display.
    Error(String),
}

impl QueryState {
    /// The resolved feed, if any.
    pub fn feed(&self) -> Option<&Feed> {
        match self {
            QueryState::Success(feed) => Some(feed),
            _ => None,
        }
    }
}

/// Resolve a raw input string when enabled, skipping work on empty input.
pub async fn resolve_query(gateway: &Gateway, raw: &str, enabled: bool) -> QueryState {
    if !enabled || raw.is_empty() {
        return QueryState::Idle;
    }

    match gateway.resolve(raw).await {
        Ok(feed) => QueryState::Success(feed),
        Err(err) => QueryState::Error(err.to_string()),
    }
}
