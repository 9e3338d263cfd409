// Weapon endpoints

use tracing::debug;

use crate::client::{CatalogClient, SearchResponse};
use crate::error::Error;
use crate::models::Weapon;

impl CatalogClient {
    /// Search weapons by filter pairs (`name`, `weaponType`, `ap`, ...).
    ///
    /// `GET /weapons/search?{filters}`
    pub async fn search_weapons(
        &self,
        params: &[(&str, String)],
    ) -> Result<SearchResponse<Weapon>, Error> {
        self.get_with_params("weapons/search", params).await
    }

    /// `GET /weapons/{id}`
    pub async fn get_weapon(&self, id: u32) -> Result<Weapon, Error> {
        debug!(id, "fetching weapon");
        self.get(self.url_with_segment("weapons", &id.to_string())?)
            .await
    }

    /// `GET /weapons/name/{name}`
    pub async fn get_weapon_by_name(&self, name: &str) -> Result<Weapon, Error> {
        debug!(name, "fetching weapon by name");
        self.get(self.url_with_segment("weapons/name", name)?)
            .await
    }
}
