//! Craft Item Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::image_field::ImageField;
use crate::error::{AppError, AppResult, ErrorCode};

/// Maximum number of images attached to one item
pub const MAX_IMAGES_PER_ITEM: usize = 3;

/// Item identifier (server sequence, or a local placeholder while offline)
pub type ItemId = i64;

/// Catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Decor,
    Crochet,
    Random,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 3] = [Self::Decor, Self::Crochet, Self::Random];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Decor => "Decor",
            ItemCategory::Crochet => "Crochet",
            ItemCategory::Random => "Random",
        }
    }

    /// Case-insensitive lookup used when reading store rows
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog item as held by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftItem {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Never empty once ingested
    pub images: Vec<String>,
    pub category: ItemCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
}

impl CraftItem {
    pub fn validate(&self) -> AppResult<()> {
        validate_fields(&self.name, self.price, &self.images)
    }
}

/// Create item payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftItemDraft {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: ItemCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
}

impl CraftItemDraft {
    pub fn validate(&self) -> AppResult<()> {
        validate_fields(&self.name, self.price, &self.images)
    }

    /// Attach an id, producing a catalog item
    pub fn into_item(self, id: ItemId) -> CraftItem {
        CraftItem {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            images: self.images,
            category: self.category,
            model_url: self.model_url,
        }
    }
}

fn validate_fields(name: &str, price: Decimal, images: &[String]) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::new(ErrorCode::ItemNameRequired).with_detail("field", "name"));
    }
    if price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::ItemInvalidPrice)
            .with_detail("field", "price")
            .with_detail("value", price.to_string()));
    }
    if images.len() > MAX_IMAGES_PER_ITEM {
        return Err(AppError::new(ErrorCode::ItemTooManyImages)
            .with_detail("field", "images")
            .with_detail("count", images.len()));
    }
    Ok(())
}

/// Row as returned by the remote store.
///
/// Every column except `id` may be null or absent (the light projection
/// omits `imageUrl`), so ingestion decides the fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CraftItemRow {
    pub id: ItemId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "modelUrl", default)]
    pub model_url: Option<String>,
}

/// Insert/update body sent to the remote store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftItemWrite {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// JSON-encoded image list, see [`ImageField::encode`]
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub category: ItemCategory,
    #[serde(rename = "modelUrl", default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
}

impl From<&CraftItemDraft> for CraftItemWrite {
    fn from(draft: &CraftItemDraft) -> Self {
        Self {
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            image_url: ImageField::encode(&draft.images),
            category: draft.category,
            model_url: draft.model_url.clone(),
        }
    }
}

impl From<&CraftItem> for CraftItemWrite {
    fn from(item: &CraftItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            image_url: ImageField::encode(&item.images),
            category: item.category,
            model_url: item.model_url.clone(),
        }
    }
}
