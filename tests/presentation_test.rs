use std::{
    collections::BTreeSet,
    time::{Duration, Instant},
};

use promptify::{
    presentation::{
        ERROR_DISPLAY, Filters, GenerationState, LibraryStatus, LyricType, SortKey, view,
    },
    types::{AlbumType, Song},
    utils,
};

// Helper function to create a test song
fn song(
    id: &str,
    album_type: AlbumType,
    explicit: bool,
    saved: Option<bool>,
    popularity: u32,
    duration_ms: u64,
    release_date: &str,
) -> Song {
    Song {
        id: id.to_string(),
        name: format!("Song {id}"),
        album_name: "Album".to_string(),
        album_external_url: None,
        album_type,
        image: None,
        artists: vec!["Artist".to_string()],
        release_date: release_date.to_string(),
        explicit,
        duration_ms,
        duration_string: utils::duration_string(duration_ms),
        external_url: None,
        uri: format!("spotify:track:{id}"),
        popularity,
        saved,
        added_at: None,
    }
}

fn library() -> Vec<Song> {
    vec![
        song("a", AlbumType::Single, true, Some(true), 70, 210_000, "2019-11-29"),
        song("b", AlbumType::Album, false, Some(false), 95, 180_000, "1975"),
        song("c", AlbumType::Single, false, None, 40, 320_000, "2001-06"),
        song("d", AlbumType::Compilation, true, Some(false), 88, 150_000, "2023-02-14"),
        song("e", AlbumType::Single, true, Some(false), 55, 240_000, "2010-01-01"),
    ]
}

fn ids(songs: &[&Song]) -> Vec<String> {
    songs.iter().map(|s| s.id.clone()).collect()
}

#[test]
fn test_default_sort_is_most_popular() {
    let songs = library();

    let shown = view(&songs, SortKey::default(), &Filters::default());

    assert_eq!(ids(&shown), vec!["b", "d", "a", "e", "c"]);
}

#[test]
fn test_least_popular() {
    let songs = library();

    let shown = view(&songs, SortKey::LeastPopular, &Filters::default());

    assert_eq!(ids(&shown), vec!["c", "e", "a", "d", "b"]);
}

#[test]
fn test_oldest_is_non_decreasing() {
    let songs = library();

    let shown = view(&songs, SortKey::Oldest, &Filters::default());

    assert_eq!(ids(&shown), vec!["b", "c", "e", "a", "d"]);
    for pair in shown.windows(2) {
        assert!(
            utils::parse_release_date(&pair[0].release_date)
                <= utils::parse_release_date(&pair[1].release_date)
        );
    }
}

#[test]
fn test_newest() {
    let songs = library();

    let shown = view(&songs, SortKey::Newest, &Filters::default());

    assert_eq!(ids(&shown), vec!["d", "a", "e", "c", "b"]);
}

#[test]
fn test_longest_is_non_increasing() {
    let songs = library();

    let shown = view(&songs, SortKey::Longest, &Filters::default());

    assert_eq!(ids(&shown), vec!["c", "e", "a", "b", "d"]);
    for pair in shown.windows(2) {
        assert!(pair[0].duration_ms >= pair[1].duration_ms);
    }
}

#[test]
fn test_shortest() {
    let songs = library();

    let shown = view(&songs, SortKey::Shortest, &Filters::default());

    assert_eq!(ids(&shown), vec!["d", "b", "a", "e", "c"]);
}

#[test]
fn test_view_does_not_touch_input() {
    let songs = library();
    let before = songs.clone();

    let _ = view(&songs, SortKey::Longest, &Filters::default());

    assert_eq!(songs, before);
}

#[test]
fn test_filters_are_anded() {
    let songs = library();
    let filters = Filters {
        release_types: BTreeSet::from([AlbumType::Single]),
        lyric_types: BTreeSet::from([LyricType::Explicit]),
        ..Filters::default()
    };

    let shown = view(&songs, SortKey::MostPopular, &filters);

    assert_eq!(ids(&shown), vec!["a", "e"]);
    assert!(
        shown
            .iter()
            .all(|s| s.album_type == AlbumType::Single && s.explicit)
    );
}

#[test]
fn test_empty_dimension_passes_everything() {
    let songs = library();
    let filters = Filters {
        release_types: BTreeSet::from([AlbumType::Single]),
        ..Filters::default()
    };

    let shown = view(&songs, SortKey::MostPopular, &filters);

    assert_eq!(ids(&shown), vec!["a", "e", "c"]);
}

#[test]
fn test_multiple_selections_in_one_dimension() {
    let songs = library();
    let filters = Filters {
        release_types: BTreeSet::from([AlbumType::Album, AlbumType::Compilation]),
        ..Filters::default()
    };

    let shown = view(&songs, SortKey::MostPopular, &filters);

    assert_eq!(ids(&shown), vec!["b", "d"]);
}

#[test]
fn test_library_filter_treats_unknown_as_unliked() {
    let songs = library();

    let liked = Filters {
        library_statuses: BTreeSet::from([LibraryStatus::Liked]),
        ..Filters::default()
    };
    assert_eq!(ids(&view(&songs, SortKey::MostPopular, &liked)), vec!["a"]);

    let unliked = Filters {
        library_statuses: BTreeSet::from([LibraryStatus::Unliked]),
        lyric_types: BTreeSet::from([LyricType::Clean]),
        ..Filters::default()
    };
    assert_eq!(
        ids(&view(&songs, SortKey::MostPopular, &unliked)),
        vec!["b", "c"]
    );
}

#[test]
fn test_generation_state_success() {
    let mut state = GenerationState::default();

    state.start();
    assert!(state.is_generating());

    state.finish();
    assert!(!state.is_generating());
    assert!(!state.error_visible(Instant::now()));
}

#[test]
fn test_generation_error_is_transient() {
    let mut state = GenerationState::default();
    let now = Instant::now();

    state.start();
    state.fail(now);

    assert!(!state.is_generating());
    assert!(state.error_visible(now));
    assert!(state.error_visible(now + ERROR_DISPLAY - Duration::from_millis(1)));
    assert!(!state.error_visible(now + ERROR_DISPLAY));

    // a new run hides the previous error
    state.start();
    assert!(!state.error_visible(now));
}
