use crate::{
    errors::CatalogError,
    spotify::{SAVED_STATUS_CHUNK, SpotifyCatalog, check_status},
};

impl SpotifyCatalog {
    /// Checks which tracks are saved in the user's library.
    ///
    /// Ids are sent in chunks of [`SAVED_STATUS_CHUNK`]; the answers are
    /// concatenated so that `result[i]` belongs to `ids[i]`.
    pub async fn contains_tracks(&self, ids: &[String]) -> Result<Vec<bool>, CatalogError> {
        let mut statuses = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(SAVED_STATUS_CHUNK) {
            let response = self
                .client
                .get(self.url("/me/tracks/contains"))
                .bearer_auth(&self.access_token)
                .query(&[("ids", chunk.join(","))])
                .send()
                .await?;

            let response = check_status(response).await?;
            let chunk_statuses = response.json::<Vec<bool>>().await?;
            if chunk_statuses.len() != chunk.len() {
                return Err(CatalogError::Decode(format!(
                    "asked for {} saved states, got {}",
                    chunk.len(),
                    chunk_statuses.len()
                )));
            }
            statuses.extend(chunk_statuses);
        }

        Ok(statuses)
    }

    pub async fn put_tracks(&self, id: &str) -> Result<(), CatalogError> {
        let response = self
            .client
            .put(self.url("/me/tracks"))
            .bearer_auth(&self.access_token)
            .query(&[("ids", id)])
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    pub async fn delete_tracks(&self, id: &str) -> Result<(), CatalogError> {
        let response = self
            .client
            .delete(self.url("/me/tracks"))
            .bearer_auth(&self.access_token)
            .query(&[("ids", id)])
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}
