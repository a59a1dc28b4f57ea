use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Token triple as handed over by the backend after login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Query parameters the backend appends to the frontend origin after the
/// OAuth callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRedirect {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlbumType {
    Album,
    Single,
    Compilation,
}

impl AlbumType {
    pub const ALL: [AlbumType; 3] = [AlbumType::Album, AlbumType::Single, AlbumType::Compilation];
}

impl fmt::Display for AlbumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlbumType::Album => "album",
            AlbumType::Single => "single",
            AlbumType::Compilation => "compilation",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// A catalog track resolved from a completion candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub album_name: String,
    pub album_external_url: Option<String>,
    pub album_type: AlbumType,
    pub image: Option<Image>,
    pub artists: Vec<String>,
    pub release_date: String,
    pub explicit: bool,
    pub duration_ms: u64,
    pub duration_string: String,
    pub external_url: Option<String>,
    pub uri: String,
    pub popularity: u32,
    #[serde(default)]
    pub saved: Option<bool>,
    #[serde(default)]
    pub added_at: Option<i64>,
}

#[derive(Tabled)]
pub struct SongTableRow {
    pub id: String,
    pub name: String,
    pub artists: String,
    pub album: String,
    pub released: String,
    pub length: String,
    #[tabled(rename = "E")]
    pub explicit: String,
    #[tabled(rename = "♥")]
    pub saved: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub artists: String,
    pub length: String,
    #[tabled(rename = "▶")]
    pub current: String,
}

// Completion API (OpenAI-compatible `/completions`)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionChoice {
    pub text: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub logprobs: Option<serde_json::Value>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub result: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpstreamCompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamCompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

// Spotify Web API

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub name: String,
    pub album_type: AlbumType,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub release_date_precision: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub popularity: u32,
    pub artists: Vec<TrackArtist>,
    pub album: TrackAlbum,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: TrackPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPage {
    pub items: Vec<CatalogTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}
