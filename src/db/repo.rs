use async_trait::async_trait;

use super::model::*;

#[async_trait]
pub trait RosterRepo: Send + Sync {
    async fn fetch_roster(&self) -> DbResult<Vec<User>>;
}

#[async_trait]
pub trait CatalogRepo: Send + Sync {
    async fn fetch_catalog(&self) -> DbResult<Vec<Track>>;
}

/// Read-only source of listeners and tracks. Only consulted at startup.
pub trait Repository: RosterRepo + CatalogRepo + Send + Sync {
    fn kind(&self) -> &'static str;
}
