// ABOUTME: Core feed library for podcal.
// ABOUTME: Provides the feed data model, feed-rs parsing boundary, and calendar aggregation.

pub mod calendar;
pub mod error;
pub mod models;
pub mod parser;

pub use calendar::{aggregate, aggregate_at, CalendarModel, Month, MONTHS, TOTAL_DAYS};
pub use error::FeedError;
pub use models::{Feed, FeedItem};
pub use parser::parse_feed_bytes;
