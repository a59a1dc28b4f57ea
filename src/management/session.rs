use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{playlist::Playback, types::Song};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub songs: Vec<Song>,
    pub playback: Playback,
}

/// Persists the CLI session (last results, playlist and play queue) between
/// invocations.
pub struct SessionManager {
    path: PathBuf,
    session: Session,
}

impl SessionManager {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            session: Session::default(),
        }
    }

    /// Loads the session at `path`, starting empty when none was saved yet.
    pub async fn load(path: PathBuf) -> Result<Self, String> {
        let session = match async_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|e| e.to_string())?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Session::default(),
            Err(e) => return Err(e.to_string()),
        };
        Ok(Self { path, session })
    }

    pub async fn persist(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.session).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Replaces the result list. Playlist and queue are left alone.
    pub fn set_songs(&mut self, songs: Vec<Song>) {
        self.session.songs = songs;
    }

    /// Finds a song in the results or the playlist by catalog id.
    pub fn find_song(&self, id: &str) -> Option<Song> {
        self.session
            .songs
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .or_else(|| self.session.playback.playlist.get(id).cloned())
    }

    /// Updates the saved flag wherever the song appears.
    pub fn mark_saved(&mut self, id: &str, saved: bool) {
        if let Some(song) = self.session.songs.iter_mut().find(|s| s.id == id) {
            song.saved = Some(saved);
        }
        self.session.playback.playlist.set_library_status(id, saved);
    }
}
