//! # Spotify Integration Module
//!
//! Thin request wrappers around the Spotify Web API and the Spotify accounts
//! service. The rest of the crate talks to the catalog through the
//! [`Catalog`] trait so that resolution and playlist logic can run against
//! an in-memory catalog in tests.
//!
//! ## Layout
//!
//! ```text
//! Catalog trait (search, library, playlist creation)
//!     └── SpotifyCatalog (reqwest, bearer token)
//!           ├── search   - GET /search
//!           ├── library  - GET /me/tracks/contains, PUT/DELETE /me/tracks
//!           └── playlist - GET /me, POST /users/{id}/playlists,
//!                          POST /playlists/{id}/tracks
//! auth - authorization URL, code exchange and refresh against
//!        /api/token, refresh through the backend proxy, CLI login flow
//! ```
//!
//! ## Error Contract
//!
//! Every call returns [`CatalogError`]. A `401` maps to
//! [`CatalogError::Unauthorized`], the caller's signal to refresh the
//! credentials; calls are never retried here.

use std::future::Future;

use reqwest::{Client, Response, StatusCode};

use crate::{
    errors::CatalogError,
    types::{CatalogTrack, CreatePlaylistResponse},
};

pub mod auth;
pub mod library;
pub mod playlist;
pub mod search;

/// Maximum number of ids `GET /me/tracks/contains` accepts per call.
pub const SAVED_STATUS_CHUNK: usize = 50;
/// Maximum number of URIs `POST /playlists/{id}/tracks` accepts per call.
pub const PLAYLIST_TRACKS_CHUNK: usize = 100;

pub trait Catalog {
    /// Up to `limit` ranked items of type `kind` matching `query`.
    fn search(
        &self,
        query: &str,
        kind: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<CatalogTrack>, CatalogError>>;

    /// Library membership of each id, in the order given.
    fn saved_status(&self, ids: &[String])
    -> impl Future<Output = Result<Vec<bool>, CatalogError>>;

    fn save_track(&self, id: &str) -> impl Future<Output = Result<(), CatalogError>>;

    fn unsave_track(&self, id: &str) -> impl Future<Output = Result<(), CatalogError>>;

    /// Creates a private playlist named `name` holding `uris` in order.
    fn create_playlist(
        &self,
        name: &str,
        uris: &[String],
    ) -> impl Future<Output = Result<CreatePlaylistResponse, CatalogError>>;
}

/// Catalog client authenticated with one access token.
#[derive(Clone)]
pub struct SpotifyCatalog {
    client: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyCatalog {
    pub fn new(client: Client, api_url: &str, access_token: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

impl Catalog for SpotifyCatalog {
    async fn search(
        &self,
        query: &str,
        kind: &str,
        limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.search_items(query, kind, limit).await
    }

    async fn saved_status(&self, ids: &[String]) -> Result<Vec<bool>, CatalogError> {
        self.contains_tracks(ids).await
    }

    async fn save_track(&self, id: &str) -> Result<(), CatalogError> {
        self.put_tracks(id).await
    }

    async fn unsave_track(&self, id: &str) -> Result<(), CatalogError> {
        self.delete_tracks(id).await
    }

    async fn create_playlist(
        &self,
        name: &str,
        uris: &[String],
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        self.create_with_tracks(name, uris).await
    }
}

/// Turns non-2xx responses into the matching [`CatalogError`].
pub(crate) async fn check_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(CatalogError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            Err(CatalogError::RateLimited { retry_after })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
