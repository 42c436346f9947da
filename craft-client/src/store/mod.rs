//! Remote catalog store
//!
//! The sync controller only talks to the store through [`CatalogStore`],
//! so tests and alternative backends can stand in for the REST client.

mod rest;

pub use rest::RestCatalogStore;

use async_trait::async_trait;
use shared::models::{CraftItemRow, CraftItemWrite, ItemId};

use crate::error::ClientResult;

/// Column set requested by a catalog select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Every column, images included
    Full,
    /// Every column except `imageUrl`
    Light,
}

impl Projection {
    pub fn columns(&self) -> &'static str {
        match self {
            Projection::Full => "id,name,description,price,imageUrl,category,modelUrl",
            Projection::Light => "id,name,description,price,category,modelUrl",
        }
    }
}

/// Catalog store trait
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All rows, ordered by id descending
    async fn select_items(&self, projection: Projection) -> ClientResult<Vec<CraftItemRow>>;

    /// Insert one row, returning the stored record
    async fn insert_item(&self, item: &CraftItemWrite) -> ClientResult<CraftItemRow>;

    /// Overwrite the writable columns of one row
    async fn update_item(&self, id: ItemId, item: &CraftItemWrite) -> ClientResult<()>;

    async fn delete_item(&self, id: ItemId) -> ClientResult<()>;
}
