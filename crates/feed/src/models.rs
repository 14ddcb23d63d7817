// ABOUTME: Data model for parsed podcast feeds.
// ABOUTME: The serialized JSON form is both the cache value and the HTTP payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a single episode entry within a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: Option<String>,
    pub url: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl FeedItem {
    /// The timestamp used for calendar bucketing: published, falling back
    /// to updated. None when the item carries neither.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.published.or(self.updated)
    }
}

/// Represents a parsed feed with metadata and items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub description: Option<String>,
    /// The feed's own canonical link, not the URL it was requested from.
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub image_title: Option<String>,
    /// Items in the order the source feed supplied them; not guaranteed
    /// chronological.
    pub items: Vec<FeedItem>,
}
