// ABOUTME: Integration tests for the feed cache gateway.
// ABOUTME: Covers cache-aside behavior, key normalization, error taxonomy, and store degradation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use httpmock::prelude::*;
use podcal_gateway::{
    cache_key, CacheError, CacheStore, Gateway, MemoryCache, QueryState, FEED_TTL,
};
use pretty_assertions::assert_eq;

const FEED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
    <channel>
        <title>Example Show</title>
        <link>https://example.com</link>
        <description>An example podcast</description>
        <item>
            <title>One</title>
            <link>https://example.com/1</link>
            <pubDate>Tue, 05 Jan 2021 09:00:00 +0000</pubDate>
        </item>
        <item>
            <title>Two</title>
            <link>https://example.com/2</link>
            <pubDate>Wed, 05 Jan 2022 09:00:00 +0000</pubDate>
        </item>
        <item>
            <title>Three</title>
            <link>https://example.com/3</link>
            <pubDate>Fri, 10 Mar 2023 09:00:00 +0000</pubDate>
        </item>
    </channel>
</rss>"#;

/// Cache store that fails every operation, for degradation tests.
struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::Unavailable("store offline".to_string()))
    }

    async fn put(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("store offline".to_string()))
    }
}

/// Cache store that must never be touched.
struct NoIoStore;

#[async_trait]
impl CacheStore for NoIoStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        panic!("unexpected cache read for {key}");
    }

    async fn put(&self, key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        panic!("unexpected cache write for {key}");
    }
}

#[tokio::test]
async fn resolve_fetches_once_within_ttl() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/feed.xml");
        then.status(200)
            .header("content-type", "application/rss+xml")
            .body(FEED_XML);
    });

    let gateway = Gateway::builder().build();
    let url = server.url("/feed.xml");

    let first = gateway.resolve(&url).await.expect("first resolve");
    let second = gateway.resolve(&url).await.expect("second resolve");

    // An equivalent spelling normalizes to the same key and also hits.
    let shouty = url.replacen("http://", "HTTP://", 1);
    let third = gateway.resolve(&shouty).await.expect("third resolve");

    mock.assert_hits(1);
    assert_eq!(first.title, "Example Show");
    assert_eq!(first, second);
    assert_eq!(first, third);
    assert_eq!(first.items.len(), 3);
}

#[tokio::test]
async fn cache_hit_serves_without_network() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/feed.xml");
        then.status(200).body(FEED_XML);
    });

    let url = server.url("/feed.xml");
    let key = cache_key(&url).unwrap();

    // Pre-populate the store by resolving through a throwaway gateway
    // sharing the same MemoryCache, then drain the hit count baseline.
    let store = Arc::new(MemoryCache::new());
    let warmup = Gateway::builder().cache(store.clone()).build();
    warmup.resolve(&url).await.expect("warmup resolve");
    mock.assert_hits(1);
    assert!(store.get(&key).await.unwrap().is_some());

    let gateway = Gateway::builder().cache(store).build();
    let feed = gateway.resolve(&url).await.expect("cached resolve");

    mock.assert_hits(1);
    assert_eq!(feed.items.len(), 3);
}

#[tokio::test]
async fn invalid_scheme_performs_no_io() {
    let gateway = Gateway::builder().cache(Arc::new(NoIoStore)).build();

    for input in ["ftp://example.com/feed", "javascript:alert(1)", "feed.xml"] {
        let err = gateway.resolve(input).await.unwrap_err();
        assert!(err.is_invalid_url(), "{input} should be InvalidUrl");
    }
}

#[tokio::test]
async fn malformed_feed_is_not_cached() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/feed.xml");
        then.status(200)
            .header("content-type", "text/html")
            .body("<html><body>definitely not a feed</body></html>");
    });

    let store = Arc::new(MemoryCache::new());
    let gateway = Gateway::builder().cache(store.clone()).build();
    let url = server.url("/feed.xml");

    let err = gateway.resolve(&url).await.unwrap_err();
    assert!(err.is_unparsable_feed());

    let key = cache_key(&url).unwrap();
    assert_eq!(store.get(&key).await.unwrap(), None);

    // A later attempt goes back upstream rather than serving the failure.
    let err = gateway.resolve(&url).await.unwrap_err();
    assert!(err.is_unparsable_feed());
    mock.assert_hits(2);
}

#[tokio::test]
async fn non_2xx_is_upstream_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/feed.xml");
        then.status(503).body("try later");
    });

    let store = Arc::new(MemoryCache::new());
    let gateway = Gateway::builder().cache(store.clone()).build();
    let url = server.url("/feed.xml");

    let err = gateway.resolve(&url).await.unwrap_err();
    assert!(err.is_upstream_unavailable());
    assert!(err.to_string().contains("503"));

    let key = cache_key(&url).unwrap();
    assert_eq!(store.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn unreachable_upstream_is_upstream_unavailable() {
    // Nothing listens on this port; connection is refused immediately.
    let gateway = Gateway::builder()
        .timeout(Duration::from_secs(2))
        .build();

    let err = gateway
        .resolve("http://127.0.0.1:9/feed.xml")
        .await
        .unwrap_err();
    assert!(err.is_upstream_unavailable());
}

#[tokio::test]
async fn failing_store_degrades_to_fetch() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/feed.xml");
        then.status(200).body(FEED_XML);
    });

    let gateway = Gateway::builder().cache(Arc::new(FailingStore)).build();
    let url = server.url("/feed.xml");

    // Read failure reads as a miss; write failure is swallowed.
    let feed = gateway.resolve(&url).await.expect("resolve despite store");
    assert_eq!(feed.items.len(), 3);

    // With no working cache, every call fetches.
    gateway.resolve(&url).await.expect("second resolve");
    mock.assert_hits(2);
}

#[tokio::test]
async fn corrupt_cache_entry_triggers_refetch() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/feed.xml");
        then.status(200).body(FEED_XML);
    });

    let url = server.url("/feed.xml");
    let key = cache_key(&url).unwrap();

    let store = Arc::new(MemoryCache::new());
    store
        .put(&key, b"{ not json".to_vec(), FEED_TTL)
        .await
        .unwrap();

    let gateway = Gateway::builder().cache(store.clone()).build();
    let feed = gateway.resolve(&url).await.expect("resolve past corruption");

    mock.assert_hits(1);
    assert_eq!(feed.title, "Example Show");

    // The refetch repaired the entry.
    let repaired = store.get(&key).await.unwrap().expect("entry rewritten");
    assert!(serde_json::from_slice::<podcal_feed::Feed>(&repaired).is_ok());
}

#[tokio::test]
async fn concurrent_misses_collapse_to_one_fetch() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/feed.xml");
        then.status(200).body(FEED_XML);
    });

    let gateway = Arc::new(Gateway::builder().build());
    let url = server.url("/feed.xml");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let gateway = gateway.clone();
        let url = url.clone();
        handles.push(tokio::spawn(async move { gateway.resolve(&url).await }));
    }

    for handle in handles {
        let feed = handle.await.unwrap().expect("concurrent resolve");
        assert_eq!(feed.items.len(), 3);
    }

    mock.assert_hits(1);
}

#[tokio::test]
async fn query_tri_state() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/feed.xml");
        then.status(200).body(FEED_XML);
    });

    let gateway = Gateway::builder().build();
    let url = server.url("/feed.xml");

    assert_eq!(
        podcal_gateway::resolve_query(&gateway, "", true).await,
        QueryState::Idle
    );
    assert_eq!(
        podcal_gateway::resolve_query(&gateway, &url, false).await,
        QueryState::Idle
    );

    let state = podcal_gateway::resolve_query(&gateway, &url, true).await;
    let feed = state.feed().expect("query should succeed");
    assert_eq!(feed.title, "Example Show");

    match podcal_gateway::resolve_query(&gateway, "ftp://nope", true).await {
        QueryState::Error(message) => assert!(message.contains("invalid URL")),
        other => panic!("expected error state, got {other:?}"),
    }
}
