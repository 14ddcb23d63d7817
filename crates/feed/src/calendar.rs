// ABOUTME: Calendar aggregation engine bucketing feed items onto a fixed 12-month grid.
// ABOUTME: Pure transformation from Feed to CalendarModel; no I/O, total for any Feed.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::models::{Feed, FeedItem};

/// Calendar months, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

/// All months in calendar order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

impl Month {
    /// Number of day slots in this month's grid.
    ///
    /// February is always 29: bucketing discards the year, so the grid
    /// must hold Feb 29 episodes from any year. Changing this changes the
    /// denominator of coverage_percentage.
    pub const fn day_count(self) -> u32 {
        match self {
            Month::January => 31,
            Month::February => 29,
            Month::March => 31,
            Month::April => 30,
            Month::May => 31,
            Month::June => 30,
            Month::July => 31,
            Month::August => 31,
            Month::September => 30,
            Month::October => 31,
            Month::November => 30,
            Month::December => 31,
        }
    }

    /// The month's English name.
    pub const fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Converts a 1-based chrono month number to a Month.
    fn from_number(month: u32) -> Month {
        match month {
            1 => Month::January,
            2 => Month::February,
            3 => Month::March,
            4 => Month::April,
            5 => Month::May,
            6 => Month::June,
            7 => Month::July,
            8 => Month::August,
            9 => Month::September,
            10 => Month::October,
            11 => Month::November,
            _ => Month::December,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Total day slots across the fixed grid.
pub const TOTAL_DAYS: u32 = {
    let mut total = 0;
    let mut i = 0;
    while i < MONTHS.len() {
        total += MONTHS[i].day_count();
        i += 1;
    }
    total
};

/// Derived, ephemeral bucketing of feed items over the fixed grid.
/// Recomputed on every aggregation call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarModel {
    /// Items bucketed by (month, day-of-month); days are 1-indexed.
    /// All 12 months are present. Within a day, items keep the order they
    /// appeared in the feed.
    pub buckets: BTreeMap<Month, BTreeMap<u32, Vec<FeedItem>>>,
    /// Total items in the feed, dated or not.
    pub episode_count: usize,
    /// Count of (month, day) pairs with at least one bucketed item.
    pub distinct_dates_covered: usize,
    /// 100 * distinct_dates_covered / 366.
    pub coverage_percentage: f64,
    /// Earliest published-or-updated timestamp, or the supplied "now"
    /// when no item carries one.
    pub oldest_episode_date: DateTime<Utc>,
}

impl CalendarModel {
    /// The items bucketed on a given (month, day), in arrival order.
    pub fn day(&self, month: Month, day: u32) -> &[FeedItem] {
        self.buckets
            .get(&month)
            .and_then(|days| days.get(&day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Aggregates a feed into a CalendarModel using the given time zone.
///
/// Convenience wrapper over [`aggregate_at`] with the current instant as
/// the oldest-date fallback.
pub fn aggregate(feed: &Feed, tz: Tz) -> CalendarModel {
    aggregate_at(feed, tz, Utc::now())
}

/// Aggregates a feed into a CalendarModel.
///
/// Pure and deterministic: any well-formed feed, including an empty one,
/// produces a defined model. The year of each timestamp is discarded;
/// bucketing answers "has this feed ever published on this calendar
/// date". Items without a published or updated timestamp count toward
/// episode_count but are never bucketed and never move
/// oldest_episode_date. `now` is used only as the oldest-date fallback
/// when no item carries a timestamp.
pub fn aggregate_at(feed: &Feed, tz: Tz, now: DateTime<Utc>) -> CalendarModel {
    let mut buckets: BTreeMap<Month, BTreeMap<u32, Vec<FeedItem>>> =
        MONTHS.iter().map(|m| (*m, BTreeMap::new())).collect();
    let mut oldest: Option<DateTime<Utc>> = None;

    for item in &feed.items {
        let Some(timestamp) = item.timestamp() else {
            continue;
        };

        let local = timestamp.with_timezone(&tz);
        let month = Month::from_number(local.month());
        let day = local.day();

        buckets
            .entry(month)
            .or_default()
            .entry(day)
            .or_default()
            .push(item.clone());

        if oldest.map_or(true, |o| timestamp < o) {
            oldest = Some(timestamp);
        }
    }

    let distinct_dates_covered = buckets
        .values()
        .flat_map(BTreeMap::values)
        .filter(|items| !items.is_empty())
        .count();

    CalendarModel {
        episode_count: feed.items.len(),
        distinct_dates_covered,
        coverage_percentage: 100.0 * distinct_dates_covered as f64 / TOTAL_DAYS as f64,
        oldest_episode_date: oldest.unwrap_or(now),
        buckets,
    }
}
