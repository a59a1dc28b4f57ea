//! The user-curated playlist and the play queue handed to the player.
//!
//! [`Playlist`] keeps membership keyed by catalog id; display order is the
//! order songs were added. [`PlayQueue`] is what actually gets played and is
//! rebuilt whenever playback starts from a song or from the whole playlist.
//! [`Playback`] ties both together so that adding a song while the playlist
//! is playing also extends the queue.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    errors::CatalogError,
    spotify::Catalog,
    types::{CreatePlaylistResponse, Song},
};

pub const DEFAULT_PLAYLIST_NAME: &str = "Promptify Playlist";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    name: String,
    songs: HashMap<String, Song>,
    /// Unset unless the queue was built from the playlist, then whether it
    /// is playing.
    playing: Option<bool>,
    /// Set after a successful save, cleared by any membership or name change.
    saved: bool,
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYLIST_NAME)
    }
}

impl Playlist {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            songs: HashMap::new(),
            playing: None,
            saved: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: &str) {
        if self.name != name {
            self.name = name.to_string();
            self.saved = false;
        }
    }

    /// Adds `song` stamped with `now_ms`. Adding a member again is a no-op
    /// and keeps its original position.
    ///
    /// Timestamps are kept strictly increasing so that insertion order
    /// survives songs added within the same millisecond.
    pub fn add(&mut self, song: &Song, now_ms: i64) -> bool {
        if self.songs.contains_key(&song.id) {
            return false;
        }

        let last = self.songs.values().filter_map(|s| s.added_at).max();
        let added_at = match last {
            Some(last) if last >= now_ms => last + 1,
            _ => now_ms,
        };

        let mut song = song.clone();
        song.added_at = Some(added_at);
        self.songs.insert(song.id.clone(), song);
        self.saved = false;
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Song> {
        let removed = self.songs.remove(id);
        if removed.is_some() {
            self.saved = false;
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.songs.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.songs.get(id)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Members in the order they were added.
    pub fn ordered(&self) -> Vec<&Song> {
        let mut songs: Vec<&Song> = self.songs.values().collect();
        songs.sort_by(|a, b| a.added_at.cmp(&b.added_at).then_with(|| a.id.cmp(&b.id)));
        songs
    }

    pub fn uris(&self) -> Vec<String> {
        self.ordered().into_iter().map(|s| s.uri.clone()).collect()
    }

    pub fn playing(&self) -> Option<bool> {
        self.playing
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Records the library status of a member.
    pub fn set_library_status(&mut self, id: &str, saved: bool) {
        if let Some(song) = self.songs.get_mut(id) {
            song.saved = Some(saved);
        }
    }

    /// Creates the playlist in the catalog with the members in display order.
    pub async fn save<C: Catalog>(
        &mut self,
        catalog: &C,
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        let response = catalog.create_playlist(&self.name, &self.uris()).await?;
        self.saved = true;
        Ok(response)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayQueue {
    pub uris: Vec<String>,
    pub current: Option<String>,
    pub playing: bool,
    /// Whether the queue was built from the playlist.
    #[serde(default)]
    pub from_playlist: bool,
}

impl PlayQueue {
    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playback {
    pub playlist: Playlist,
    pub queue: PlayQueue,
}

impl Playback {
    /// Adds the song, or removes it when it already is a member. Returns
    /// whether the song is a member afterwards.
    pub fn toggle(&mut self, song: &Song, now_ms: i64) -> bool {
        if self.playlist.contains(&song.id) {
            self.remove(&song.id);
            false
        } else {
            self.add(song, now_ms);
            true
        }
    }

    /// Adds the song to the playlist. While the playlist is playing, the
    /// song is also appended to the queue so playback continues into it.
    pub fn add(&mut self, song: &Song, now_ms: i64) -> bool {
        let inserted = self.playlist.add(song, now_ms);
        if inserted
            && self.queue.from_playlist
            && self.queue.playing
            && !self.queue.uris.contains(&song.uri)
        {
            self.queue.uris.push(song.uri.clone());
        }
        inserted
    }

    /// Removes the song from the playlist and, unless it is the song being
    /// played, from a queue built from the playlist.
    pub fn remove(&mut self, id: &str) -> Option<Song> {
        let removed = self.playlist.remove(id)?;
        if self.queue.from_playlist && self.queue.current.as_deref() != Some(removed.uri.as_str())
        {
            self.queue.uris.retain(|uri| uri != &removed.uri);
        }
        Some(removed)
    }

    /// Plays a single song: the queue holds only that song.
    pub fn play_song(&mut self, song: &Song) {
        self.queue = PlayQueue {
            uris: vec![song.uri.clone()],
            current: Some(song.uri.clone()),
            playing: true,
            from_playlist: false,
        };
        self.sync_playlist_flag();
    }

    /// Plays the whole playlist in insertion order, resuming at the current
    /// song when it is a member and starting at the first song otherwise.
    /// Returns `false` for an empty playlist.
    pub fn play_playlist(&mut self) -> bool {
        let uris = self.playlist.uris();
        let Some(first) = uris.first().cloned() else {
            return false;
        };

        let current = match &self.queue.current {
            Some(current) if uris.contains(current) => current.clone(),
            _ => first,
        };

        self.queue = PlayQueue {
            uris,
            current: Some(current),
            playing: true,
            from_playlist: true,
        };
        self.sync_playlist_flag();
        true
    }

    pub fn pause(&mut self) {
        self.queue.playing = false;
        self.sync_playlist_flag();
    }

    /// Resumes the current song; returns `false` when nothing is queued.
    pub fn resume(&mut self) -> bool {
        if self.queue.current.is_none() {
            return false;
        }
        self.queue.playing = true;
        self.sync_playlist_flag();
        true
    }

    fn sync_playlist_flag(&mut self) {
        self.playlist.playing = self
            .queue
            .from_playlist
            .then_some(self.queue.playing);
    }
}
