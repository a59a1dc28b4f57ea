use crate::{
    errors::CatalogError,
    spotify::{PLAYLIST_TRACKS_CHUNK, SpotifyCatalog, check_status},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUser,
    },
};

impl SpotifyCatalog {
    pub async fn current_user(&self) -> Result<CurrentUser, CatalogError> {
        let response = self
            .client
            .get(self.url("/me"))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json::<CurrentUser>().await?)
    }

    /// Creates a private playlist for the current user and fills it with
    /// `uris`, keeping their order.
    pub async fn create_with_tracks(
        &self,
        name: &str,
        uris: &[String],
    ) -> Result<CreatePlaylistResponse, CatalogError> {
        let user = self.current_user().await?;

        let request = CreatePlaylistRequest {
            name: name.to_string(),
            description: "Generated with Promptify".to_string(),
            public: false,
            collaborative: false,
        };

        let response = self
            .client
            .post(self.url(&format!("/users/{}/playlists", user.id)))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let response = check_status(response).await?;
        let playlist = response.json::<CreatePlaylistResponse>().await?;

        for chunk in uris.chunks(PLAYLIST_TRACKS_CHUNK) {
            self.add_tracks(&playlist.id, chunk.to_vec()).await?;
        }

        Ok(playlist)
    }

    pub async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: Vec<String>,
    ) -> Result<AddTrackToPlaylistResponse, CatalogError> {
        let response = self
            .client
            .post(self.url(&format!("/playlists/{playlist_id}/tracks")))
            .bearer_auth(&self.access_token)
            .json(&AddTrackToPlaylistRequest { uris })
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json::<AddTrackToPlaylistResponse>().await?)
    }
}
