//! Sync mode and session state

use serde::{Deserialize, Serialize};
use shared::models::CraftItem;

use crate::selection::{Cart, Wishlist};

/// Reason recorded when the catalog table does not exist
pub const MISSING_STORE_REASON: &str = "missing backing store";

/// Connection mode of the catalog session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "reason", rename_all = "snake_case")]
pub enum SyncMode {
    /// A catalog fetch is in progress
    Loading,
    /// Mutations are sent to the remote store
    Online,
    /// Mutations are applied locally only
    Offline,
    /// The store is misconfigured; the sample catalog is shown and
    /// mutations stay local
    FatalError(String),
}

impl SyncMode {
    pub fn is_online(&self) -> bool {
        matches!(self, SyncMode::Online)
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, SyncMode::Offline)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncMode::FatalError(_))
    }

    /// Mutations skip the store: it is unreachable or known to be missing
    pub fn writes_locally(&self) -> bool {
        matches!(self, SyncMode::Offline | SyncMode::FatalError(_))
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMode::Loading => write!(f, "loading"),
            SyncMode::Online => write!(f, "online"),
            SyncMode::Offline => write!(f, "offline"),
            SyncMode::FatalError(reason) => write!(f, "error: {}", reason),
        }
    }
}

/// Everything the controller guards behind one lock
#[derive(Debug)]
pub(crate) struct SyncState {
    pub items: Vec<CraftItem>,
    pub mode: SyncMode,
    pub cart: Cart,
    pub wishlist: Wishlist,
}

impl SyncState {
    pub fn new(wishlist: Wishlist) -> Self {
        Self {
            items: Vec::new(),
            mode: SyncMode::Loading,
            cart: Cart::default(),
            wishlist,
        }
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|i| i.id == id)
    }
}
