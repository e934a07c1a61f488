//! Past/upcoming partitioning of the shows attached to a venue or an artist.
//!
//! Nothing here is stored. Every view is derived at read time against a single
//! evaluation instant that the caller captures once.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};

/// Where "now" itself falls when counting upcoming shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpcomingBoundary {
    /// `start_time >= now`, used for detail pages and area listings.
    Inclusive,
    /// `start_time > now`, used for search result counts.
    Exclusive,
}

impl UpcomingBoundary {
    pub fn is_upcoming(self, start_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            UpcomingBoundary::Inclusive => start_time >= now,
            UpcomingBoundary::Exclusive => start_time > now,
        }
    }
}

/// A show seen from one side of the booking: it carries the *other* party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedShow {
    pub show_id: i64,
    pub counterpart_id: i64,
    pub counterpart_name: String,
    pub counterpart_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowSchedule {
    pub past_shows: Vec<BookedShow>,
    pub upcoming_shows: Vec<BookedShow>,
}

impl ShowSchedule {
    /// Partition `shows` around `now`. Both halves come back ordered by start time.
    pub fn build(shows: Vec<BookedShow>, now: DateTime<Utc>) -> Self {
        let (mut upcoming_shows, mut past_shows): (Vec<_>, Vec<_>) = shows
            .into_iter()
            .partition(|show| UpcomingBoundary::Inclusive.is_upcoming(show.start_time, now));

        past_shows.sort_by_key(|show| (show.start_time, show.show_id));
        upcoming_shows.sort_by_key(|show| (show.start_time, show.show_id));

        Self {
            past_shows,
            upcoming_shows,
        }
    }

    pub fn past_shows_count(&self) -> usize {
        self.past_shows.len()
    }

    pub fn upcoming_shows_count(&self) -> usize {
        self.upcoming_shows.len()
    }
}

/// Count upcoming shows per owner key (venue id or artist id).
pub fn count_upcoming_by<K, I>(
    shows: I,
    now: DateTime<Utc>,
    boundary: UpcomingBoundary,
) -> HashMap<K, usize>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, DateTime<Utc>)>,
{
    let mut counts = HashMap::new();
    for (key, start_time) in shows {
        if boundary.is_upcoming(start_time, now) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

/// ISO-8601 rendering used for every show start time handed to clients.
pub fn format_start_time(start_time: DateTime<Utc>) -> String {
    start_time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
