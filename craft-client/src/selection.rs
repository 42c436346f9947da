//! Visitor selections: cart and wishlist

use std::collections::BTreeSet;

use shared::models::{CraftItem, ItemId};

use crate::prefs::{PreferenceStore, PrefsError};

/// Preference key holding the wishlist
pub const WISHLIST_KEY: &str = "wishlistItems";

/// Items the visitor wants to ask about. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CraftItem>,
}

impl Cart {
    /// Add an item. Returns false when it is already in the cart.
    pub fn add(&mut self, item: CraftItem) -> bool {
        if self.contains(item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    /// Refresh the cart copy of an edited item
    pub fn replace(&mut self, item: &CraftItem) -> bool {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item.clone();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    pub fn items(&self) -> &[CraftItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drain the cart
    pub fn take(&mut self) -> Vec<CraftItem> {
        std::mem::take(&mut self.items)
    }
}

/// Set of wished-for item ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    ids: BTreeSet<ItemId>,
}

impl Wishlist {
    /// Read the persisted wishlist. A missing key is an empty wishlist.
    pub fn load(prefs: &dyn PreferenceStore) -> Result<Self, PrefsError> {
        let ids = match prefs.get(WISHLIST_KEY)? {
            Some(raw) => serde_json::from_str::<Vec<ItemId>>(&raw)?
                .into_iter()
                .collect(),
            None => BTreeSet::new(),
        };
        Ok(Self { ids })
    }

    pub fn save(&self, prefs: &dyn PreferenceStore) -> Result<(), PrefsError> {
        let ids: Vec<ItemId> = self.ids.iter().copied().collect();
        prefs.set(WISHLIST_KEY, &serde_json::to_string(&ids)?)
    }

    /// Flip membership, returning whether the id is now wished for
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
