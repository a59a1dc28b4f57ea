use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashSet},
};

use base64::{
    Engine,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
};
use chrono::{NaiveDate, Utc};
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use sha2::Sha256;

use crate::types::{AlbumType, CatalogTrack, Song};

type HmacSha256 = Hmac<Sha256>;

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Random alphanumeric anti-forgery value for the OAuth `state` parameter.
pub fn generate_state(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Signs a cookie value as `s:<value>.<base64 hmac-sha256>` (unpadded).
pub fn sign_cookie(value: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(value.as_bytes());
    let signature = STANDARD_NO_PAD.encode(mac.finalize().into_bytes());
    format!("s:{value}.{signature}")
}

/// Returns the original value of a cookie produced by [`sign_cookie`], or
/// `None` if it is not signed or the signature does not verify.
pub fn unsign_cookie(signed: &str, secret: &str) -> Option<String> {
    let body = signed.strip_prefix("s:")?;
    let (value, signature) = body.rsplit_once('.')?;
    let signature = STANDARD_NO_PAD
        .decode(signature.trim_end_matches('='))
        .ok()?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(value.as_bytes());
    mac.verify_slice(&signature).ok()?;
    Some(value.to_string())
}

/// Finds a cookie by name in a `Cookie` request header.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.trim_matches('"').to_string())
    })
}

pub fn basic_auth(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}

/// Formats milliseconds as `M:SS`, or `H:MM:SS` from one hour on.
pub fn duration_string(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Moves the year to the end: `2019-11-29` becomes `11/29/2019`,
/// `2019-11` becomes `11/2019`.
pub fn display_release_date(release_date: &str) -> String {
    let mut tokens: Vec<&str> = release_date.split('-').collect();
    if tokens.len() > 1 {
        let year = tokens.remove(0);
        tokens.push(year);
    }
    tokens.join("/")
}

/// Parses catalog release dates of any precision (`YYYY`, `YYYY-MM`,
/// `YYYY-MM-DD`); missing components default to 1.
pub fn parse_release_date(release_date: &str) -> Option<NaiveDate> {
    let mut parts = release_date.trim().splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(m) => m.parse::<u32>().ok()?,
        None => 1,
    };
    let day = match parts.next() {
        Some(d) => d.parse::<u32>().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Orders release dates chronologically, unparseable dates first.
pub fn compare_release_dates(a: &str, b: &str) -> Ordering {
    parse_release_date(a).cmp(&parse_release_date(b))
}

pub fn song_from_track(track: CatalogTrack) -> Song {
    Song {
        duration_string: duration_string(track.duration_ms),
        id: track.id,
        name: track.name,
        album_name: track.album.name,
        album_external_url: track.album.external_urls.spotify,
        album_type: track.album.album_type,
        image: track.album.images.into_iter().next(),
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        release_date: track.album.release_date,
        explicit: track.explicit,
        duration_ms: track.duration_ms,
        external_url: track.external_urls.spotify,
        uri: track.uri,
        popularity: track.popularity,
        saved: None,
        added_at: None,
    }
}

/// Keeps the first song for every catalog id.
pub fn remove_duplicate_songs(songs: &mut Vec<Song>) {
    let mut seen_ids = HashSet::new();
    songs.retain(|song| seen_ids.insert(song.id.clone()));
}

/// Parses a comma-separated list of release types (`album`, `single`,
/// `compilation` or `all`) for the `--release-type` flag.
pub fn parse_release_types(input: &str) -> Result<BTreeSet<AlbumType>, String> {
    if input.trim().is_empty() {
        return Err("release type cannot be empty".to_string());
    }

    let mut kinds = BTreeSet::new();
    for segment in input.split(',') {
        let segment = segment.trim().to_lowercase();
        match segment.as_str() {
            "" => return Err(format!("empty segment in '{input}'")),
            "all" => kinds.extend(AlbumType::ALL),
            "album" | "albums" => {
                kinds.insert(AlbumType::Album);
            }
            "single" | "singles" => {
                kinds.insert(AlbumType::Single);
            }
            "compilation" | "compilations" => {
                kinds.insert(AlbumType::Compilation);
            }
            other => {
                return Err(format!(
                    "invalid value '{other}', expected album, single, compilation or all"
                ));
            }
        }
    }
    Ok(kinds)
}

pub fn song_artists(song: &Song) -> String {
    song.artists.join(", ")
}
