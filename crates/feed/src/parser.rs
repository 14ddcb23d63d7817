// ABOUTME: Feed parsing implementation using feed-rs.
// ABOUTME: Maps feed-rs types to the internal Feed/FeedItem model.

use crate::error::FeedError;
use crate::models::{Feed, FeedItem};
use feed_rs::model::{Entry, Feed as FeedRsFeed, Link};

/// Parses feed bytes into a Feed struct.
///
/// # Arguments
/// * `data` - Raw feed bytes (RSS, Atom, or JSON Feed)
///
/// # Returns
/// * `Ok(Feed)` - Successfully parsed feed with items in source order
/// * `Err(FeedError)` - Empty body or parse failure
pub fn parse_feed_bytes(data: &[u8]) -> Result<Feed, FeedError> {
    if data.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(FeedError::Empty);
    }

    let parsed = feed_rs::parser::parse(data).map_err(FeedError::parse)?;

    let items: Vec<FeedItem> = parsed.entries.iter().map(map_entry).collect();
    let url = extract_canonical_url(&parsed.links);
    let (image_url, image_title) = extract_feed_image(&parsed);

    Ok(Feed {
        title: parsed.title.map(|t| t.content).unwrap_or_default(),
        description: parsed.description.map(|d| d.content),
        url,
        image_url,
        image_title,
        items,
    })
}

/// Extracts the feed's canonical link.
/// Prefers link with rel="alternate", otherwise uses first link href.
fn extract_canonical_url(links: &[Link]) -> Option<String> {
    for link in links {
        if link.rel.as_deref() == Some("alternate") {
            return Some(link.href.clone());
        }
    }
    links.first().map(|l| l.href.clone())
}

/// Extracts feed-level image URL and title.
/// feed-rs stores channel artwork (RSS <image>, iTunes image) in logo;
/// icon is the fallback.
fn extract_feed_image(feed: &FeedRsFeed) -> (Option<String>, Option<String>) {
    if let Some(ref logo) = feed.logo {
        return (Some(logo.uri.clone()), logo.title.clone());
    }
    if let Some(ref icon) = feed.icon {
        return (Some(icon.uri.clone()), icon.title.clone());
    }
    (None, None)
}

/// Extracts the item URL from entry links.
/// Prefers rel="alternate", then the first non-enclosure link.
fn extract_item_url(entry: &Entry) -> Option<String> {
    for link in &entry.links {
        if link.rel.as_deref() == Some("alternate") {
            return Some(link.href.clone());
        }
    }
    entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() != Some("enclosure"))
        .map(|l| l.href.clone())
}

/// Maps a feed-rs Entry to our FeedItem model.
fn map_entry(entry: &Entry) -> FeedItem {
    FeedItem {
        title: entry.title.as_ref().map(|t| t.content.clone()),
        url: extract_item_url(entry),
        published: entry.published,
        updated: entry.updated,
    }
}
