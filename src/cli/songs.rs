use reqwest::Client;
use tabled::Table;

use crate::{
    cli::context,
    error, info,
    presentation::{self, Filters, SortKey},
    spotify::Catalog,
    success,
    types::{Song, SongTableRow},
    utils, warning,
};

/// Shows the last generated songs through the given sort and filters.
pub async fn songs(sort: SortKey, filters: &Filters) {
    let manager = context::load_session().await;
    let songs = &manager.session().songs;

    if songs.is_empty() {
        warning!("No songs yet. Run promptify generate <prompt>.");
        return;
    }

    print_songs(songs, sort, filters);
}

pub(crate) fn print_songs(songs: &[Song], sort: SortKey, filters: &Filters) {
    let shown = presentation::view(songs, sort, filters);
    if shown.is_empty() {
        info!("No song matches the selected filters.");
        return;
    }

    let count = shown.len();
    let rows: Vec<SongTableRow> = shown
        .into_iter()
        .map(|song| SongTableRow {
            id: song.id.clone(),
            name: song.name.clone(),
            artists: utils::song_artists(song),
            album: format!("{} ({})", song.album_name, song.album_type),
            released: utils::display_release_date(&song.release_date),
            length: song.duration_string.clone(),
            explicit: if song.explicit { "E" } else { "" }.to_string(),
            saved: match song.saved {
                Some(true) => "♥",
                Some(false) => "",
                None => "?",
            }
            .to_string(),
        })
        .collect();

    println!("{}", Table::new(rows));
    info!("{} of {} songs, sorted by {}", count, songs.len(), sort);
}

/// Adds the song to the user's library.
pub async fn like(id: &str) {
    set_saved(id, true).await
}

/// Removes the song from the user's library.
pub async fn unlike(id: &str) {
    set_saved(id, false).await
}

async fn set_saved(id: &str, saved: bool) {
    let mut manager = context::load_session().await;
    let Some(song) = manager.find_song(id) else {
        error!("No song with id {} in the current session.", id);
    };

    let client = Client::new();
    let credentials = context::credential_store(&client);
    let access_token = context::access_token(&credentials).await;
    let catalog = context::catalog(&client, &access_token);

    let result = if saved {
        catalog.save_track(&song.id).await
    } else {
        catalog.unsave_track(&song.id).await
    };
    if let Err(e) = result {
        context::catalog_failure(&credentials, e).await;
        return;
    }

    manager.mark_saved(&song.id, saved);
    context::persist_session(&manager).await;

    if saved {
        success!("Added '{}' to your library.", song.name);
    } else {
        success!("Removed '{}' from your library.", song.name);
    }
}
