// ── Catalog facade ──
//
// Cheaply cloneable handle over the API client. Converts wire payloads to
// domain models and transport errors to `CoreError`, tagging not-found
// errors with what was being looked up.

use std::sync::Arc;

use grimdarkly_api::{CatalogClient, TransportConfig};
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::error::CoreError;
use crate::model::{Faction, RecordKind, Unit, Weapon};
use crate::search::params::{SearchParams, UnitSearchParams, WeaponSearchParams};

/// Fetched search results of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults {
    Units(Vec<Unit>),
    Weapons(Vec<Weapon>),
}

impl SearchResults {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Units(_) => RecordKind::Unit,
            Self::Weapons(_) => RecordKind::Weapon,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Units(u) => u.len(),
            Self::Weapons(w) => w.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone)]
pub struct Catalog {
    client: Arc<CatalogClient>,
}

impl Catalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = CatalogClient::new(&config.api_url, &transport)?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: CatalogClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn api_url(&self) -> &str {
        self.client.base_url().as_str()
    }

    // ── Factions ─────────────────────────────────────────────────

    pub async fn factions(&self) -> Result<Vec<Faction>, CoreError> {
        let raw = self.client.list_factions().await?;
        Ok(raw.into_iter().map(Faction::from).collect())
    }

    pub async fn faction(&self, id: u32) -> Result<Faction, CoreError> {
        self.client
            .get_faction(id)
            .await
            .map(Faction::from)
            .map_err(|e| CoreError::from(e).for_entity("Faction", id))
    }

    // ── Search ───────────────────────────────────────────────────

    /// Run a search for whichever kind `params` describes.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResults, CoreError> {
        let result = match params {
            SearchParams::Unit(p) => self.search_units(p).await.map(SearchResults::Units),
            SearchParams::Weapon(p) => self.search_weapons(p).await.map(SearchResults::Weapons),
        };
        if let Err(ref e) = result {
            warn!(kind = params.kind().noun(), error = %e, "search failed");
        }
        result
    }

    pub async fn search_units(&self, params: &UnitSearchParams) -> Result<Vec<Unit>, CoreError> {
        let resp = self.client.search_units(&params.to_query_pairs()).await?;
        debug!(count = resp.data.len(), "unit search returned");
        Ok(resp.data.into_iter().map(Unit::from).collect())
    }

    pub async fn search_weapons(
        &self,
        params: &WeaponSearchParams,
    ) -> Result<Vec<Weapon>, CoreError> {
        let resp = self.client.search_weapons(&params.to_query_pairs()).await?;
        debug!(count = resp.data.len(), "weapon search returned");
        Ok(resp.data.into_iter().map(Weapon::from).collect())
    }

    // ── Single records ───────────────────────────────────────────

    pub async fn unit(&self, id: u32) -> Result<Unit, CoreError> {
        self.client
            .get_unit(id)
            .await
            .map(Unit::from)
            .map_err(|e| CoreError::from(e).for_entity("Unit", id))
    }

    pub async fn unit_by_name(&self, name: &str) -> Result<Unit, CoreError> {
        self.client
            .get_unit_by_name(name)
            .await
            .map(Unit::from)
            .map_err(|e| CoreError::from(e).for_entity("Unit", name))
    }

    pub async fn weapon(&self, id: u32) -> Result<Weapon, CoreError> {
        self.client
            .get_weapon(id)
            .await
            .map(Weapon::from)
            .map_err(|e| CoreError::from(e).for_entity("Weapon", id))
    }

    pub async fn weapon_by_name(&self, name: &str) -> Result<Weapon, CoreError> {
        self.client
            .get_weapon_by_name(name)
            .await
            .map(Weapon::from)
            .map_err(|e| CoreError::from(e).for_entity("Weapon", name))
    }

    /// Look a unit up by numeric id, or by exact name otherwise.
    pub async fn find_unit(&self, key: &str) -> Result<Unit, CoreError> {
        match key.trim().parse::<u32>() {
            Ok(id) => self.unit(id).await,
            Err(_) => self.unit_by_name(key.trim()).await,
        }
    }

    /// Look a weapon up by numeric id, or by exact name otherwise.
    pub async fn find_weapon(&self, key: &str) -> Result<Weapon, CoreError> {
        match key.trim().parse::<u32>() {
            Ok(id) => self.weapon(id).await,
            Err(_) => self.weapon_by_name(key.trim()).await,
        }
    }
}
