//! Catalog synchronization

mod controller;
mod notice;
mod state;

pub use controller::CatalogSync;
pub use notice::{LocalReason, Mutation, Notice, NoticeLevel};
pub use state::{MISSING_STORE_REASON, SyncMode};
