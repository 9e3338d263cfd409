// Faction endpoints

use tracing::debug;

use crate::client::CatalogClient;
use crate::error::Error;
use crate::models::Faction;

impl CatalogClient {
    /// List every faction.
    ///
    /// `GET /factions`
    pub async fn list_factions(&self) -> Result<Vec<Faction>, Error> {
        debug!("listing factions");
        self.get(self.url("factions")?).await
    }

    /// Fetch one faction.
    ///
    /// `GET /factions/{id}`
    pub async fn get_faction(&self, id: u32) -> Result<Faction, Error> {
        debug!(id, "fetching faction");
        self.get(self.url_with_segment("factions", &id.to_string())?)
            .await
    }
}
