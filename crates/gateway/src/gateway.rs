// ABOUTME: Cache-aside gateway resolving feed URLs to parsed feeds.
// ABOUTME: Normalizes the URL, consults the cache store, fetches and parses on a miss.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use podcal_feed::{parse_feed_bytes, Feed};
use tokio::sync::Mutex;
use tracing::warn;
use url::Url;

use crate::cache::CacheStore;
use crate::error::GatewayError;
use crate::options::{GatewayBuilder, Options};

/// How long a successfully parsed feed stays cached: 30 hours.
pub const FEED_TTL: Duration = Duration::from_secs(108_000);

/// Derives the cache key for a requested URL.
///
/// Rejects non-http(s) schemes, then uses the canonical serialization of
/// the parsed URL so equivalent spellings (case-insensitive scheme/host,
/// default ports, missing path) map to the same key. The key is never the
/// raw input string.
pub fn cache_key(requested_url: &str) -> Result<String, GatewayError> {
    let parsed = Url::parse(requested_url)
        .map_err(|e| GatewayError::invalid_url(requested_url, Some(anyhow::anyhow!(e))))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed.to_string()),
        scheme => Err(GatewayError::invalid_url(
            requested_url,
            Some(anyhow::anyhow!("scheme must be http or https, got {scheme}")),
        )),
    }
}

/// The feed cache gateway.
///
/// Orchestrates normalize -> cache lookup -> fetch-on-miss -> parse ->
/// cache-store -> respond. Repeated calls with equivalent URLs within the
/// TTL window never re-fetch, and concurrent misses for the same key are
/// collapsed into one upstream fetch. Distinct keys are never serialized
/// against each other.
pub struct Gateway {
    opts: Options,
    http_client: reqwest::Client,
    store: Arc<dyn CacheStore>,
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Gateway {
    /// Create a new GatewayBuilder for configuring the gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// Create a new Gateway with the given options and cache store.
    pub fn new(opts: Options, store: Arc<dyn CacheStore>) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .build()
                .expect("failed to build HTTP client")
        });

        Self {
            opts,
            http_client,
            store,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a feed URL to a parsed Feed.
    ///
    /// Cache read failures and corrupt entries degrade to a miss; a cache
    /// write failure never fails the request. Parse failures are not
    /// cached. Errors are scoped to this call.
    pub async fn resolve(&self, requested_url: &str) -> Result<Feed, GatewayError> {
        let key = cache_key(requested_url)?;

        if let Some(feed) = self.lookup(&key).await {
            return Ok(feed);
        }

        let flight = self.flight_for(&key).await;
        let guard = flight.lock().await;

        // A concurrent flight may have filled the cache while we waited.
        let result = match self.lookup(&key).await {
            Some(feed) => Ok(feed),
            None => self.fetch_and_store(requested_url, &key).await,
        };

        drop(guard);
        self.end_flight(&key).await;
        result
    }

    /// Cache lookup, degrading every store-side failure mode to a miss.
    async fn lookup(&self, key: &str) -> Option<Feed> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(feed) => Some(feed),
            Err(err) => {
                warn!(key, error = %err, "corrupt cache entry, re-fetching");
                None
            }
        }
    }

    /// Fetch the feed from upstream, parse it, and store on success.
    async fn fetch_and_store(&self, requested_url: &str, key: &str) -> Result<Feed, GatewayError> {
        let response = self
            .http_client
            .get(requested_url)
            .send()
            .await
            .map_err(|e| GatewayError::upstream(requested_url, Some(anyhow::anyhow!(e))))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::upstream(
                requested_url,
                Some(anyhow::anyhow!("upstream returned {status}")),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::upstream(requested_url, Some(anyhow::anyhow!(e))))?;

        let feed = parse_feed_bytes(&body)
            .map_err(|e| GatewayError::unparsable(requested_url, Some(anyhow::anyhow!(e))))?;

        match serde_json::to_vec(&feed) {
            Ok(bytes) => {
                if let Err(err) = self.store.put(key, bytes, self.opts.ttl).await {
                    warn!(key, error = %err, "cache write failed, serving uncached feed");
                }
            }
            Err(err) => {
                warn!(key, error = %err, "feed serialization failed, serving uncached feed");
            }
        }

        Ok(feed)
    }

    /// The single-flight mutex for a key, creating it on first use.
    async fn flight_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut inflight = self.inflight.lock().await;
        inflight.entry(key.to_string()).or_default().clone()
    }

    /// Drop a completed flight from the registry so the map stays bounded.
    async fn end_flight(&self, key: &str) {
        self.inflight.lock().await.remove(key);
    }
}
