// ABOUTME: Feed cache gateway library for podcal.
// ABOUTME: Re-exports the public API: Gateway, GatewayBuilder, CacheStore, MemoryCache, errors, QueryState.

//! Cache-aside gateway resolving podcast feed URLs to parsed feeds.
//!
//! The gateway normalizes the requested URL into a cache key, serves from
//! the cache store when possible, and otherwise fetches, parses, and
//! caches the feed with a bounded TTL.
//!
//! # Example
//!
//! ```no_run
//! use podcal_gateway::Gateway;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), podcal_gateway::GatewayError> {
//!     let gateway = Gateway::builder().build();
//!     let feed = gateway.resolve("https://example.com/feed.xml").await?;
//!     println!("{}: {} episodes", feed.title, feed.items.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod gateway;
pub mod options;
pub mod query;

pub use cache::{CacheStore, MemoryCache};
pub use error::{CacheError, ErrorCode, GatewayError};
pub use gateway::{cache_key, Gateway, FEED_TTL};
pub use options::{GatewayBuilder, Options};
pub use query::{resolve_query, QueryState};
