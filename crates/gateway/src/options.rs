// ABOUTME: Configuration options for the feed cache gateway.
// ABOUTME: GatewayBuilder provides a fluent API for constructing Gateway instances.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStore, MemoryCache};
use crate::gateway::{Gateway, FEED_TTL};

/// Configuration options for the gateway.
#[derive(Debug, Clone)]
pub struct Options {
    /// Upper bound on the upstream fetch, including connect time.
    pub timeout: Duration,
    pub user_agent: String,
    /// TTL applied to cache writes.
    pub ttl: Duration,
    pub http_client: Option<reqwest::Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: "podcal/0.1".to_string(),
            ttl: FEED_TTL,
            http_client: None,
        }
    }
}

/// Builder for constructing Gateway instances with custom configuration.
pub struct GatewayBuilder {
    opts: Options,
    store: Option<Arc<dyn CacheStore>>,
}

impl GatewayBuilder {
    /// Create a new GatewayBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
            store: None,
        }
    }

    /// Set the upstream fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the TTL applied to cache writes.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.opts.ttl = ttl;
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Use a custom cache store.
    pub fn cache(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the Gateway, defaulting to an in-memory cache store.
    pub fn build(self) -> Gateway {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryCache::new()) as Arc<dyn CacheStore>);
        Gateway::new(self.opts, store)
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
