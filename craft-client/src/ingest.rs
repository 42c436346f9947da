//! Row ingestion and data repair
//!
//! Turns store rows into [`CraftItem`]s. Every path into the in-memory
//! catalog goes through here, so the image invariants hold everywhere:
//! no item has an empty image list, and no image points at a dead host.

use std::collections::HashSet;

use rust_decimal::Decimal;
use shared::models::{CraftItem, CraftItemRow, ImageField, ItemCategory};

use crate::config::RepairPolicy;
use crate::store::Projection;

impl RepairPolicy {
    /// Whether an image reference must be replaced by the placeholder
    pub fn is_dead(&self, uri: &str) -> bool {
        if uri.trim().is_empty() {
            return true;
        }
        let lower = uri.to_lowercase();
        self.deprecated_hosts
            .iter()
            .any(|host| lower.contains(&host.to_lowercase()))
    }

    /// Replace dead references in place and guarantee at least one image
    pub fn repair_images(&self, images: Vec<String>) -> Vec<String> {
        let mut repaired: Vec<String> = images
            .into_iter()
            .map(|uri| {
                if self.is_dead(&uri) {
                    self.placeholder_image.clone()
                } else {
                    uri
                }
            })
            .collect();
        if repaired.is_empty() {
            repaired.push(self.placeholder_image.clone());
        }
        repaired
    }
}

/// Ingest a batch of rows fetched with the given projection.
///
/// Rows with an id already seen earlier in the batch are dropped.
pub fn ingest_rows(
    rows: Vec<CraftItemRow>,
    projection: Projection,
    policy: &RepairPolicy,
) -> Vec<CraftItem> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.id) {
            tracing::warn!(id = row.id, "Duplicate item id in store response, skipping");
            continue;
        }
        let item = match projection {
            Projection::Full => ingest_row(row, policy),
            Projection::Light => ingest_light_row(row, policy),
        };
        items.push(item);
    }
    items
}

/// Ingest a full-projection row
pub fn ingest_row(row: CraftItemRow, policy: &RepairPolicy) -> CraftItem {
    let images = ImageField::parse(row.image_url.as_deref())
        .map(ImageField::into_images)
        .unwrap_or_default();
    let images = policy.repair_images(images);
    build_item(row, images)
}

/// Ingest a light-projection row: images are always the placeholder,
/// whatever was known about the item before.
pub fn ingest_light_row(row: CraftItemRow, policy: &RepairPolicy) -> CraftItem {
    let images = vec![policy.placeholder_image.clone()];
    build_item(row, images)
}

fn build_item(row: CraftItemRow, images: Vec<String>) -> CraftItem {
    let category = match row.category.as_deref().and_then(ItemCategory::parse) {
        Some(c) => c,
        None => {
            tracing::warn!(
                id = row.id,
                category = ?row.category,
                "Unknown item category, filing under Random"
            );
            ItemCategory::Random
        }
    };

    let price = match row.price {
        Some(p) if p >= Decimal::ZERO => p,
        Some(p) => {
            tracing::warn!(id = row.id, price = %p, "Negative price in store, clamping to zero");
            Decimal::ZERO
        }
        None => Decimal::ZERO,
    };

    CraftItem {
        id: row.id,
        name: row.name.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        price,
        images,
        category,
        model_url: row.model_url.filter(|u| !u.is_empty()),
    }
}
