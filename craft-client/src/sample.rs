//! Built-in sample catalog
//!
//! Shown when the remote store is missing or unreachable so the storefront
//! stays browsable.

use rust_decimal::Decimal;
use shared::models::{CraftItem, ItemCategory};

use crate::config::RepairPolicy;

struct SampleEntry {
    id: i64,
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    category: ItemCategory,
}

const SAMPLE_ENTRIES: &[SampleEntry] = &[
    SampleEntry {
        id: 6,
        name: "Pastel Cloud Wall Hanging",
        description: "Macrame cloud with soft pastel tassels for a nursery wall.",
        price_cents: 2400,
        category: ItemCategory::Decor,
    },
    SampleEntry {
        id: 5,
        name: "Sleepy Bunny Plush",
        description: "Hand-crocheted cotton bunny with embroidered sleepy eyes.",
        price_cents: 1850,
        category: ItemCategory::Crochet,
    },
    SampleEntry {
        id: 4,
        name: "Mini Succulent Trio",
        description: "Three crocheted succulents in painted clay pots.",
        price_cents: 1500,
        category: ItemCategory::Crochet,
    },
    SampleEntry {
        id: 3,
        name: "Hand-Painted Coasters",
        description: "Set of four sealed wooden coasters with floral motifs.",
        price_cents: 1200,
        category: ItemCategory::Decor,
    },
    SampleEntry {
        id: 2,
        name: "Mystery Craft Bag",
        description: "A surprise bundle of small handmade goodies.",
        price_cents: 1000,
        category: ItemCategory::Random,
    },
    SampleEntry {
        id: 1,
        name: "Beaded Phone Charm",
        description: "Glass bead charm strung on braided cord.",
        price_cents: 650,
        category: ItemCategory::Random,
    },
];

/// Sample catalog, ordered by id descending like a store fetch.
///
/// Every item carries the configured placeholder as its only image.
pub fn sample_catalog(policy: &RepairPolicy) -> Vec<CraftItem> {
    SAMPLE_ENTRIES
        .iter()
        .map(|e| CraftItem {
            id: e.id,
            name: e.name.to_string(),
            description: e.description.to_string(),
            price: Decimal::new(e.price_cents, 2),
            images: vec![policy.placeholder_image.clone()],
            category: e.category,
            model_url: None,
        })
        .collect()
}
