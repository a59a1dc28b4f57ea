use reqwest::Client;
use tabled::Table;

use crate::{
    cli::context,
    error, info,
    management::SessionManager,
    success,
    types::{PlaylistTableRow, Song},
    utils, warning,
};

pub async fn list() {
    let manager = context::load_session().await;
    let playback = &manager.session().playback;
    let playlist = &playback.playlist;

    if playlist.is_empty() {
        info!("Playlist '{}' is empty.", playlist.name());
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlist
        .ordered()
        .into_iter()
        .enumerate()
        .map(|(index, song)| PlaylistTableRow {
            position: index + 1,
            name: song.name.clone(),
            artists: utils::song_artists(song),
            length: song.duration_string.clone(),
            current: match playback.queue.current.as_deref() {
                Some(uri) if uri == song.uri && playback.queue.playing => "▶",
                Some(uri) if uri == song.uri => "‖",
                _ => "",
            }
            .to_string(),
        })
        .collect();

    let status = if playlist.is_saved() { "saved" } else { "not saved" };
    println!(
        "Playlist: {name} ({status})\n{table}",
        name = playlist.name(),
        status = status,
        table = Table::new(rows)
    );
}

pub async fn add(ids: &[String]) {
    let mut manager = context::load_session().await;
    let now = utils::now_millis();

    for id in ids {
        let Some(song) = lookup(&manager, id) else {
            continue;
        };
        if manager.session_mut().playback.add(&song, now) {
            success!("Added '{}' to the playlist.", song.name);
        } else {
            info!("'{}' is already in the playlist.", song.name);
        }
    }

    context::persist_session(&manager).await;
}

pub async fn remove(ids: &[String]) {
    let mut manager = context::load_session().await;

    for id in ids {
        match manager.session_mut().playback.remove(id) {
            Some(song) => success!("Removed '{}' from the playlist.", song.name),
            None => warning!("No song with id {} in the playlist.", id),
        }
    }

    context::persist_session(&manager).await;
}

pub async fn toggle(id: &str) {
    let mut manager = context::load_session().await;
    let Some(song) = lookup(&manager, id) else {
        return;
    };

    if manager
        .session_mut()
        .playback
        .toggle(&song, utils::now_millis())
    {
        success!("Added '{}' to the playlist.", song.name);
    } else {
        success!("Removed '{}' from the playlist.", song.name);
    }

    context::persist_session(&manager).await;
}

/// Plays a single song, or the whole playlist when no id is given.
pub async fn play(id: Option<&str>) {
    let mut manager = context::load_session().await;

    match id {
        Some(id) => {
            let Some(song) = lookup(&manager, id) else {
                return;
            };
            manager.session_mut().playback.play_song(&song);
            success!("Playing '{}'.", song.name);
        }
        None => {
            if !manager.session_mut().playback.play_playlist() {
                warning!("Playlist is empty, nothing to play.");
                return;
            }
            let playback = &manager.session().playback;
            success!(
                "Playing '{}' ({} songs).",
                playback.playlist.name(),
                playback.queue.uris.len()
            );
        }
    }

    context::persist_session(&manager).await;
}

pub async fn pause() {
    let mut manager = context::load_session().await;
    manager.session_mut().playback.pause();
    context::persist_session(&manager).await;
    success!("Paused.");
}

pub async fn resume() {
    let mut manager = context::load_session().await;
    if !manager.session_mut().playback.resume() {
        warning!("Nothing to resume.");
        return;
    }
    context::persist_session(&manager).await;
    success!("Resumed.");
}

pub async fn rename(name: &str) {
    let name = name.trim();
    if name.is_empty() {
        error!("Playlist name must not be empty.");
    }

    let mut manager = context::load_session().await;
    manager.session_mut().playback.playlist.rename(name);
    context::persist_session(&manager).await;
    success!("Playlist renamed to '{}'.", name);
}

/// Creates the playlist in the user's Spotify account.
pub async fn save() {
    let mut manager = context::load_session().await;
    let playlist = &manager.session().playback.playlist;

    if playlist.is_empty() {
        warning!("Playlist is empty, nothing to save.");
        return;
    }
    if playlist.is_saved() {
        info!("Playlist '{}' is already saved.", playlist.name());
        return;
    }

    let client = Client::new();
    let credentials = context::credential_store(&client);
    let access_token = context::access_token(&credentials).await;
    let catalog = context::catalog(&client, &access_token);

    let pb = context::spinner("Saving playlist...");
    let result = manager.session_mut().playback.playlist.save(&catalog).await;
    pb.finish_and_clear();

    match result {
        Ok(created) => {
            context::persist_session(&manager).await;
            success!("Playlist '{}' saved.", created.name);
            if let Some(url) = created.external_urls.spotify {
                info!("{}", url);
            }
        }
        Err(e) => context::catalog_failure(&credentials, e).await,
    }
}

fn lookup(manager: &SessionManager, id: &str) -> Option<Song> {
    let song = manager.find_song(id);
    if song.is_none() {
        warning!("No song with id {} in the current session.", id);
    }
    song
}
