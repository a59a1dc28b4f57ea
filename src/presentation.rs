//! Sorted and filtered views over a resolved song list.

use std::{
    cmp::Ordering,
    collections::BTreeSet,
    fmt,
    time::{Duration, Instant},
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    types::{AlbumType, Song},
    utils,
};

/// How long a resolution error stays visible.
pub const ERROR_DISPLAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum SortKey {
    #[default]
    MostPopular,
    LeastPopular,
    Shortest,
    Longest,
    Newest,
    Oldest,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::MostPopular => "most popular",
            SortKey::LeastPopular => "least popular",
            SortKey::Shortest => "shortest",
            SortKey::Longest => "longest",
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum LyricType {
    Explicit,
    Clean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum LibraryStatus {
    Liked,
    Unliked,
}

/// Per-dimension selections. An empty selection lets everything through;
/// dimensions are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub release_types: BTreeSet<AlbumType>,
    pub lyric_types: BTreeSet<LyricType>,
    pub library_statuses: BTreeSet<LibraryStatus>,
}

impl Filters {
    pub fn matches(&self, song: &Song) -> bool {
        let lyric = if song.explicit {
            LyricType::Explicit
        } else {
            LyricType::Clean
        };
        // unknown library status counts as not liked
        let library = if song.saved == Some(true) {
            LibraryStatus::Liked
        } else {
            LibraryStatus::Unliked
        };

        passes(&self.release_types, &song.album_type)
            && passes(&self.lyric_types, &lyric)
            && passes(&self.library_statuses, &library)
    }
}

fn passes<T: Ord>(selection: &BTreeSet<T>, value: &T) -> bool {
    selection.is_empty() || selection.contains(value)
}

pub fn compare(sort: SortKey, a: &Song, b: &Song) -> Ordering {
    match sort {
        SortKey::MostPopular => b.popularity.cmp(&a.popularity),
        SortKey::LeastPopular => a.popularity.cmp(&b.popularity),
        SortKey::Shortest => a.duration_ms.cmp(&b.duration_ms),
        SortKey::Longest => b.duration_ms.cmp(&a.duration_ms),
        SortKey::Newest => utils::compare_release_dates(&b.release_date, &a.release_date),
        SortKey::Oldest => utils::compare_release_dates(&a.release_date, &b.release_date),
    }
}

/// The displayed ordering of `songs`; the input is left untouched.
pub fn view<'a>(songs: &'a [Song], sort: SortKey, filters: &Filters) -> Vec<&'a Song> {
    let mut shown: Vec<&Song> = songs.iter().filter(|s| filters.matches(s)).collect();
    shown.sort_by(|a, b| compare(sort, a, b));
    shown
}

/// Tracks the "generating" spinner and the transient error banner.
#[derive(Debug, Default)]
pub struct GenerationState {
    generating: bool,
    error_raised_at: Option<Instant>,
}

impl GenerationState {
    pub fn start(&mut self) {
        self.generating = true;
        self.error_raised_at = None;
    }

    pub fn finish(&mut self) {
        self.generating = false;
    }

    pub fn fail(&mut self, now: Instant) {
        self.generating = false;
        self.error_raised_at = Some(now);
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn error_visible(&self, now: Instant) -> bool {
        self.error_raised_at
            .is_some_and(|raised| now.saturating_duration_since(raised) < ERROR_DISPLAY)
    }
}
