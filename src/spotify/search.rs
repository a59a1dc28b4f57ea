use crate::{
    errors::CatalogError,
    spotify::{SpotifyCatalog, check_status},
    types::{CatalogTrack, SearchResponse},
};

impl SpotifyCatalog {
    /// Searches the catalog.
    ///
    /// Only track results are decoded; `kind` is passed through as the
    /// `type` parameter. Items come back in the catalog's ranking order.
    pub async fn search_items(
        &self,
        query: &str,
        kind: &str,
        limit: u32,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(self.url("/search"))
            .bearer_auth(&self.access_token)
            .query(&[("q", query), ("type", kind), ("limit", limit.as_str())])
            .send()
            .await?;

        let response = check_status(response).await?;
        let json = response.json::<SearchResponse>().await?;

        Ok(json.tracks.items)
    }
}
