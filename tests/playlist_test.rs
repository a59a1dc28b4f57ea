use std::sync::Mutex;

use promptify::{
    errors::CatalogError,
    management::SessionManager,
    playlist::{DEFAULT_PLAYLIST_NAME, Playback, Playlist},
    spotify::Catalog,
    types::{AlbumType, CatalogTrack, CreatePlaylistResponse, ExternalUrls, Song},
};

// Helper function to create a test song
fn song(id: &str) -> Song {
    Song {
        id: id.to_string(),
        name: format!("Song {id}"),
        album_name: "Album".to_string(),
        album_external_url: None,
        album_type: AlbumType::Album,
        image: None,
        artists: vec!["Artist".to_string()],
        release_date: "2020-01-01".to_string(),
        explicit: false,
        duration_ms: 200_000,
        duration_string: "3:20".to_string(),
        external_url: None,
        uri: format!("spotify:track:{id}"),
        popularity: 50,
        saved: None,
        added_at: None,
    }
}

fn uri(id: &str) -> String {
    format!("spotify:track:{id}")
}

#[derive(Default)]
struct RecordingCatalog {
    created: Mutex<Vec<(String, Vec<String>)>>,
    fail: bool,
}

impl Catalog for RecordingCatalog {
    async fn search(
        &self,
        _query: &str,
        _kind: &str,
        _limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        Ok(Vec::new())
    }

    async fn saved_status(&self, ids: &[String]) -> Result<Vec<bool>, CatalogError> {
        Ok(vec![false; ids.len()])
    }

    async fn save_track(&self, _id: &str) -> Result<(), CatalogError> {
        Ok(())
    }

    async fn unsave_track(&self, _id: &str) -> Result<(), CatalogError> {
        Ok(())
    }

    async fn create_playlist(
        &self,
        name: &str,
        uris: &[String],
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        if self.fail {
            return Err(CatalogError::Unauthorized);
        }
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), uris.to_vec()));
        Ok(CreatePlaylistResponse {
            id: "p1".to_string(),
            name: name.to_string(),
            external_urls: ExternalUrls::default(),
        })
    }
}

#[test]
fn test_new_playlist_defaults() {
    let playlist = Playlist::default();

    assert_eq!(playlist.name(), DEFAULT_PLAYLIST_NAME);
    assert!(playlist.is_empty());
    assert_eq!(playlist.playing(), None);
    assert!(!playlist.is_saved());
}

#[test]
fn test_order_follows_insertion_time() {
    let mut playlist = Playlist::default();

    playlist.add(&song("c"), 100);
    playlist.add(&song("a"), 200);
    playlist.add(&song("b"), 300);

    assert_eq!(playlist.uris(), vec![uri("c"), uri("a"), uri("b")]);
}

#[test]
fn test_same_millisecond_keeps_insertion_order() {
    let mut playlist = Playlist::default();

    playlist.add(&song("z"), 100);
    playlist.add(&song("a"), 100);
    playlist.add(&song("m"), 100);

    assert_eq!(playlist.uris(), vec![uri("z"), uri("a"), uri("m")]);
}

#[test]
fn test_adding_twice_is_a_no_op() {
    let mut playlist = Playlist::default();

    assert!(playlist.add(&song("a"), 100));
    assert!(playlist.add(&song("b"), 200));
    assert!(!playlist.add(&song("a"), 300));

    assert_eq!(playlist.len(), 2);
    assert_eq!(playlist.get("a").unwrap().added_at, Some(100));
    assert_eq!(playlist.uris(), vec![uri("a"), uri("b")]);
}

#[test]
fn test_toggle_adds_then_removes() {
    let mut playback = Playback::default();

    assert!(playback.toggle(&song("a"), 100));
    assert!(playback.playlist.contains("a"));

    assert!(!playback.toggle(&song("a"), 200));
    assert!(!playback.playlist.contains("a"));
}

#[test]
fn test_play_song_queues_only_that_song() {
    let mut playback = Playback::default();
    playback.add(&song("a"), 100);

    assert!(playback.play_playlist());
    assert_eq!(playback.playlist.playing(), Some(true));

    playback.play_song(&song("x"));

    assert_eq!(playback.queue.uris, vec![uri("x")]);
    assert_eq!(playback.queue.current, Some(uri("x")));
    assert!(playback.queue.playing);
    assert!(!playback.queue.from_playlist);
    assert_eq!(playback.playlist.playing(), None);

    playback.pause();
    assert_eq!(playback.playlist.playing(), None);
}

#[test]
fn test_play_playlist_starts_at_first_song() {
    let mut playback = Playback::default();
    playback.add(&song("a"), 100);
    playback.add(&song("b"), 200);

    assert!(playback.play_playlist());

    assert_eq!(playback.queue.uris, vec![uri("a"), uri("b")]);
    assert_eq!(playback.queue.current, Some(uri("a")));
    assert!(playback.queue.playing);
    assert_eq!(playback.playlist.playing(), Some(true));
}

#[test]
fn test_play_playlist_resumes_at_current_member() {
    let mut playback = Playback::default();
    playback.add(&song("a"), 100);
    playback.add(&song("b"), 200);
    playback.play_song(&song("b"));

    assert!(playback.play_playlist());

    assert_eq!(playback.queue.uris, vec![uri("a"), uri("b")]);
    assert_eq!(playback.queue.current, Some(uri("b")));
}

#[test]
fn test_play_empty_playlist() {
    let mut playback = Playback::default();

    assert!(!playback.play_playlist());
    assert!(playback.queue.is_empty());
}

#[test]
fn test_pause_and_resume_keep_queue() {
    let mut playback = Playback::default();
    playback.add(&song("a"), 100);
    playback.add(&song("b"), 200);
    playback.play_playlist();
    let queue = playback.queue.clone();

    playback.pause();
    assert!(!playback.queue.playing);
    assert_eq!(playback.queue.uris, queue.uris);
    assert_eq!(playback.queue.current, queue.current);
    assert_eq!(playback.playlist.playing(), Some(false));

    assert!(playback.resume());
    assert_eq!(playback.queue, queue);
    assert_eq!(playback.playlist.playing(), Some(true));
}

#[test]
fn test_resume_without_queue() {
    let mut playback = Playback::default();

    assert!(!playback.resume());
}

#[test]
fn test_adding_while_playing_extends_queue() {
    let mut playback = Playback::default();
    playback.add(&song("a"), 100);
    playback.play_playlist();

    playback.add(&song("b"), 200);

    assert_eq!(playback.queue.uris, vec![uri("a"), uri("b")]);
    assert_eq!(playback.queue.current, Some(uri("a")));
}

#[test]
fn test_adding_while_paused_does_not_extend_queue() {
    let mut playback = Playback::default();
    playback.add(&song("a"), 100);
    playback.play_playlist();
    playback.pause();

    playback.add(&song("b"), 200);

    assert_eq!(playback.queue.uris, vec![uri("a")]);
}

#[test]
fn test_adding_during_single_song_playback_does_not_extend_queue() {
    let mut playback = Playback::default();
    playback.play_song(&song("x"));

    playback.add(&song("b"), 200);

    assert_eq!(playback.queue.uris, vec![uri("x")]);
}

#[test]
fn test_removing_keeps_current_song_queued() {
    let mut playback = Playback::default();
    playback.add(&song("a"), 100);
    playback.add(&song("b"), 200);
    playback.play_playlist();

    playback.remove("b");
    assert_eq!(playback.queue.uris, vec![uri("a")]);

    playback.remove("a");
    assert_eq!(playback.queue.uris, vec![uri("a")]);
    assert!(playback.playlist.is_empty());
}

#[tokio::test]
async fn test_save_sends_name_and_ordered_uris() {
    let catalog = RecordingCatalog::default();
    let mut playlist = Playlist::new("Rainy Sunday");
    playlist.add(&song("b"), 100);
    playlist.add(&song("a"), 200);

    let created = playlist.save(&catalog).await.unwrap();

    assert_eq!(created.name, "Rainy Sunday");
    assert!(playlist.is_saved());
    assert_eq!(
        catalog.created.lock().unwrap().clone(),
        vec![("Rainy Sunday".to_string(), vec![uri("b"), uri("a")])]
    );
}

#[tokio::test]
async fn test_saved_flag_resets_on_change() {
    let catalog = RecordingCatalog::default();
    let mut playlist = Playlist::default();
    playlist.add(&song("a"), 100);

    playlist.save(&catalog).await.unwrap();
    playlist.add(&song("b"), 200);
    assert!(!playlist.is_saved());

    playlist.save(&catalog).await.unwrap();
    playlist.remove("a");
    assert!(!playlist.is_saved());

    playlist.save(&catalog).await.unwrap();
    playlist.rename(DEFAULT_PLAYLIST_NAME);
    assert!(playlist.is_saved());
    playlist.rename("Another name");
    assert!(!playlist.is_saved());
}

#[tokio::test]
async fn test_failed_save_leaves_flag_unset() {
    let catalog = RecordingCatalog {
        fail: true,
        ..RecordingCatalog::default()
    };
    let mut playlist = Playlist::default();
    playlist.add(&song("a"), 100);

    let err = playlist.save(&catalog).await.unwrap_err();

    assert!(matches!(err, CatalogError::Unauthorized));
    assert!(!playlist.is_saved());
}

#[tokio::test]
async fn test_session_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut manager = SessionManager::load(path.clone()).await.unwrap();
    assert!(manager.session().songs.is_empty());

    manager.set_songs(vec![song("a"), song("b")]);
    manager.session_mut().playback.add(&song("b"), 100);
    manager.session_mut().playback.play_playlist();
    manager.mark_saved("b", true);
    manager.persist().await.unwrap();

    let reloaded = SessionManager::load(path).await.unwrap();
    let session = reloaded.session();
    assert_eq!(session.songs.len(), 2);
    assert_eq!(session.songs[1].saved, Some(true));
    assert_eq!(session.playback.playlist.get("b").unwrap().saved, Some(true));
    assert_eq!(session.playback.queue.current, Some(uri("b")));
    assert_eq!(reloaded.find_song("a").map(|s| s.id), Some("a".to_string()));
    assert!(reloaded.find_song("missing").is_none());
}
