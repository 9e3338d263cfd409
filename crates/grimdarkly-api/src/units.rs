// Unit endpoints

use tracing::debug;

use crate::client::{CatalogClient, SearchResponse};
use crate::error::Error;
use crate::models::Unit;

impl CatalogClient {
    /// Search units by filter pairs (`name`, `faction`, `minToughness`, ...).
    ///
    /// `GET /units/search?{filters}`
    pub async fn search_units(
        &self,
        params: &[(&str, String)],
    ) -> Result<SearchResponse<Unit>, Error> {
        self.get_with_params("units/search", params).await
    }

    /// `GET /units/{id}`
    pub async fn get_unit(&self, id: u32) -> Result<Unit, Error> {
        debug!(id, "fetching unit");
        self.get(self.url_with_segment("units", &id.to_string())?)
            .await
    }

    /// Look a unit up by its exact name.
    ///
    /// `GET /units/name/{name}`
    pub async fn get_unit_by_name(&self, name: &str) -> Result<Unit, Error> {
        debug!(name, "fetching unit by name");
        self.get(self.url_with_segment("units/name", name)?).await
    }
}
