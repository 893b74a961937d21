//! Classification of stream events against the saved library.
//!
//! An event is *in library* when its `artist:track` key matches a library
//! entry, and a *podcast* when its artist is not among the library's
//! artists. Only events that are neither count as new song listens.
//!
//! The podcast flag is an approximation: a publisher that shares a name
//! with a saved artist passes as music, and a musician with nothing saved
//! is treated as a podcast source.

use crate::history::StreamEvent;
use crate::identity::Identity;
use crate::library::LibraryEntry;
use log::{debug, info};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Lookup sets built once from the library.
#[derive(Debug, Default)]
pub struct LibraryIndex<'a> {
    by_id: HashMap<String, &'a LibraryEntry>,
    artists: HashSet<&'a str>,
}

impl<'a> LibraryIndex<'a> {
    pub fn build(entries: &'a [LibraryEntry]) -> Self {
        let mut index = Self::default();
        for entry in entries {
            // First entry wins so the join stays one row per event.
            index.by_id.entry(entry.unique_id()).or_insert(entry);
            index.artists.insert(entry.artist.as_str());
        }
        debug!(
            "Library index: {} unique tracks, {} artists",
            index.by_id.len(),
            index.artists.len()
        );
        index
    }

    pub fn contains_track(&self, unique_id: &str) -> bool {
        self.by_id.contains_key(unique_id)
    }

    pub fn contains_artist(&self, artist: &str) -> bool {
        self.artists.contains(artist)
    }

    pub fn lookup(&self, unique_id: &str) -> Option<&'a LibraryEntry> {
        self.by_id.get(unique_id).copied()
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }
}

/// The four possible outcomes of classifying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// Not in the library, known artist.
    NewSong,
    /// In the library, known artist.
    Owned,
    /// Unknown artist.
    Podcast,
    /// In the library yet flagged as a podcast. Only reachable through a
    /// colon key collision.
    OwnedPodcast,
}

/// A stream event with its classification and joined library metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEvent<'a> {
    pub event: &'a StreamEvent,
    pub unique_id: String,
    pub in_library: bool,
    pub is_podcast: bool,
    pub album: Option<&'a str>,
    pub track_uri: Option<&'a str>,
}

impl ClassifiedEvent<'_> {
    pub fn is_new_song_listen(&self) -> bool {
        !self.in_library && !self.is_podcast
    }

    pub fn category(&self) -> Category {
        match (self.in_library, self.is_podcast) {
            (false, false) => Category::NewSong,
            (true, false) => Category::Owned,
            (false, true) => Category::Podcast,
            (true, true) => Category::OwnedPodcast,
        }
    }
}

/// Classify a single event against a prebuilt index.
pub fn classify_event<'a>(event: &'a StreamEvent, index: &LibraryIndex<'a>) -> ClassifiedEvent<'a> {
    let unique_id = event.unique_id();
    let matched = index.lookup(&unique_id);
    ClassifiedEvent {
        event,
        in_library: index.contains_track(&unique_id),
        is_podcast: !index.contains_artist(&event.artist_name),
        album: matched.and_then(|e| e.album.as_deref()),
        track_uri: matched.and_then(LibraryEntry::track_uri),
        unique_id,
    }
}

/// Classify every event, in input order.
pub fn classify<'a>(events: &'a [StreamEvent], library: &'a [LibraryEntry]) -> Vec<ClassifiedEvent<'a>> {
    let index = LibraryIndex::build(library);
    let classified: Vec<ClassifiedEvent<'a>> =
        events.iter().map(|event| classify_event(event, &index)).collect();

    let summary = ClassificationSummary::from_events(&classified);
    let new_minutes: f64 = classified
        .iter()
        .filter(|c| c.is_new_song_listen())
        .map(|c| c.event.mins_played())
        .sum();
    info!(
        "Classified {} events against {} library artists: {} new songs ({:.0} min), {} owned, {} podcast",
        summary.total,
        index.artist_count(),
        summary.new_songs,
        new_minutes,
        summary.owned,
        summary.podcasts
    );
    classified
}

/// Counts per [`Category`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    pub total: usize,
    pub new_songs: usize,
    pub owned: usize,
    pub podcasts: usize,
    pub owned_podcasts: usize,
}

impl ClassificationSummary {
    pub fn from_events(events: &[ClassifiedEvent<'_>]) -> Self {
        events.iter().fold(Self::default(), |mut acc, e| {
            acc.total += 1;
            match e.category() {
                Category::NewSong => acc.new_songs += 1,
                Category::Owned => acc.owned += 1,
                Category::Podcast => acc.podcasts += 1,
                Category::OwnedPodcast => acc.owned_podcasts += 1,
            }
            acc
        })
    }
}
