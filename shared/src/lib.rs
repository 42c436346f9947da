//! Shared types for the craft storefront
//!
//! Catalog models, the store's wire shapes, and the unified error
//! system used by the client and any view layer built on top of it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use models::{CraftItem, CraftItemDraft, ItemCategory, ItemId};
pub use serde::{Deserialize, Serialize};
