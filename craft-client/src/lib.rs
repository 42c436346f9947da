//! Craft Client - catalog synchronization for the craft storefront
//!
//! Keeps the storefront's catalog in memory, synchronized with a
//! PostgREST-backed store. Remote failures never reach callers: they show
//! up as [`SyncMode`] changes and [`Notice`]s instead.
//!
//! ```no_run
//! use craft_client::{CatalogSync, ClientConfig};
//!
//! # async fn run() -> shared::AppResult<()> {
//! let sync = CatalogSync::connect(&ClientConfig::from_env())?;
//! let mut notices = sync.subscribe();
//! let mode = sync.load_catalog().await;
//! println!("{} items, {}", sync.items().await.len(), mode);
//! while let Ok(notice) = notices.try_recv() {
//!     println!("{}", notice);
//! }
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod config;
pub mod error;
pub mod image;
pub mod ingest;
pub mod logger;
pub mod prefs;
pub mod sample;
pub mod selection;
pub mod store;
pub mod sync;

pub use admin::AdminGate;
pub use config::{ClientConfig, RepairPolicy, RetryPolicy};
pub use error::{ClientError, ClientResult, ErrorClass};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use store::{CatalogStore, Projection, RestCatalogStore};
pub use sync::{CatalogSync, LocalReason, Mutation, Notice, NoticeLevel, SyncMode};

// Re-export shared types for convenience
pub use shared::models::{CraftItem, CraftItemDraft, ItemCategory, ItemId};
