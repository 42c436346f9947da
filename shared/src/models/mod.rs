//! Data models
//!
//! Shared between the sync controller and the views that render it.
//! `*Row` and `*Write` types mirror the remote store's column layout;
//! everything else is the client-side shape.

pub mod craft_item;
pub mod image_field;

// Re-exports
pub use craft_item::*;
pub use image_field::*;
