//! Catalog synchronization controller
//!
//! Owns the in-memory catalog and the connection mode. Views read state
//! through the accessors and change it only through the operations here.
//!
//! Locking:
//! - `state` is held only for in-memory reads and writes, never across a
//!   store call, so readers never wait on the network.
//! - `write_gate` serializes mutations end to end (local change, remote
//!   call, mode change). A finished catalog load also takes it briefly
//!   to swap the item list.
//! - `loading` rejects a second load while one is in progress.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shared::error::{AppError, AppResult};
use shared::models::{CraftItem, CraftItemDraft, CraftItemWrite, ItemId};
use shared::util::local_item_id;
use tokio::sync::{Mutex, RwLock, broadcast};

use super::notice::{LocalReason, Mutation, Notice};
use super::state::{MISSING_STORE_REASON, SyncMode, SyncState};
use crate::config::{ClientConfig, RepairPolicy, RetryPolicy};
use crate::error::{ClientError, ErrorClass};
use crate::ingest::{ingest_row, ingest_rows};
use crate::prefs::{FilePreferenceStore, PreferenceStore};
use crate::sample::sample_catalog;
use crate::selection::Wishlist;
use crate::store::{CatalogStore, Projection, RestCatalogStore};

/// Notice channel capacity
const NOTICE_CAPACITY: usize = 64;

/// Result of one catalog load, before it is applied
enum LoadOutcome {
    Full(Vec<CraftItem>),
    Degraded(Vec<CraftItem>),
    MissingStore,
    Unreachable,
}

/// Clears the in-progress flag when the load ends, however it ends
struct LoadGuard<'a>(&'a AtomicBool);

impl<'a> LoadGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Catalog synchronization controller
pub struct CatalogSync {
    store: Arc<dyn CatalogStore>,
    prefs: Arc<dyn PreferenceStore>,
    retry: RetryPolicy,
    repair: RepairPolicy,
    state: RwLock<SyncState>,
    write_gate: Mutex<()>,
    loading: AtomicBool,
    notices: broadcast::Sender<Notice>,
}

impl CatalogSync {
    /// Create a controller with default policies.
    ///
    /// The wishlist is read from `prefs` here; a corrupt value is logged
    /// and replaced by an empty wishlist. The catalog starts empty in
    /// `Loading` mode until [`load_catalog`](Self::load_catalog) runs.
    pub fn new(store: Arc<dyn CatalogStore>, prefs: Arc<dyn PreferenceStore>) -> Self {
        let wishlist = Wishlist::load(prefs.as_ref()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read saved wishlist, starting empty");
            Wishlist::default()
        });
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            store,
            prefs,
            retry: RetryPolicy::default(),
            repair: RepairPolicy::default(),
            state: RwLock::new(SyncState::new(wishlist)),
            write_gate: Mutex::new(()),
            loading: AtomicBool::new(false),
            notices,
        }
    }

    /// Build the REST store and file preferences described by `config`
    pub fn connect(config: &ClientConfig) -> AppResult<Self> {
        let store = RestCatalogStore::new(config)?;
        let prefs = FilePreferenceStore::open_or_reset(&config.prefs_path)?;
        tracing::info!(
            endpoint = %store.endpoint(),
            prefs = %prefs.path().display(),
            "Catalog sync configured"
        );
        Ok(Self::new(Arc::new(store), Arc::new(prefs))
            .with_retry(config.retry)
            .with_repair(config.repair.clone()))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_repair(mut self, repair: RepairPolicy) -> Self {
        self.repair = repair;
        self
    }

    /// Subscribe to status notices
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    // ========== State access ==========

    pub async fn mode(&self) -> SyncMode {
        self.state.read().await.mode.clone()
    }

    /// Current catalog, newest first
    pub async fn items(&self) -> Vec<CraftItem> {
        self.state.read().await.items.clone()
    }

    pub async fn item(&self, id: ItemId) -> Option<CraftItem> {
        let state = self.state.read().await;
        state.items.iter().find(|i| i.id == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    // ========== Catalog load ==========

    /// Fetch the catalog from the store.
    ///
    /// Never fails: every outcome is expressed as the returned mode plus
    /// the items now held. A call made while another load is running
    /// returns the current mode without touching the store.
    pub async fn load_catalog(&self) -> SyncMode {
        let Some(_guard) = LoadGuard::acquire(&self.loading) else {
            tracing::debug!("Catalog load already in progress");
            return self.mode().await;
        };

        self.state.write().await.mode = SyncMode::Loading;
        let outcome = self.fetch_catalog().await;

        let _gate = self.write_gate.lock().await;
        let (items, mode, notice) = match outcome {
            LoadOutcome::Full(items) => {
                tracing::info!(count = items.len(), "Catalog loaded");
                (items, SyncMode::Online, None)
            }
            LoadOutcome::Degraded(items) => {
                tracing::warn!(count = items.len(), "Catalog loaded without images");
                (items, SyncMode::Online, Some(Notice::DegradedCatalog))
            }
            LoadOutcome::MissingStore => (
                sample_catalog(&self.repair),
                SyncMode::FatalError(MISSING_STORE_REASON.to_string()),
                Some(Notice::MissingBackingStore),
            ),
            LoadOutcome::Unreachable => (
                sample_catalog(&self.repair),
                SyncMode::Offline,
                Some(Notice::CatalogUnavailable),
            ),
        };

        {
            let mut state = self.state.write().await;
            state.items = items;
            state.mode = mode.clone();
        }
        if let Some(notice) = notice {
            self.notify(notice);
        }
        mode
    }

    /// Run [`load_catalog`](Self::load_catalog) again from the top
    pub async fn retry_connection(&self) -> SyncMode {
        tracing::info!("Retrying catalog connection");
        self.load_catalog().await
    }

    async fn fetch_catalog(&self) -> LoadOutcome {
        let mut retries = 0u32;
        let last_error = loop {
            match self.store.select_items(Projection::Full).await {
                Ok(rows) => {
                    return LoadOutcome::Full(ingest_rows(rows, Projection::Full, &self.repair));
                }
                Err(e) => match e.class() {
                    ErrorClass::Structural => {
                        tracing::error!(error = %e, "Catalog table is missing, showing sample catalog");
                        return LoadOutcome::MissingStore;
                    }
                    ErrorClass::Transient if retries < self.retry.max_retries => {
                        retries += 1;
                        tracing::warn!(
                            error = %e,
                            delay_ms = self.retry.retry_delay.as_millis() as u64,
                            "Catalog fetch failed, retrying (attempt {}/{})",
                            retries,
                            self.retry.max_retries
                        );
                        tokio::time::sleep(self.retry.retry_delay).await;
                    }
                    _ => break e,
                },
            }
        };

        if !should_try_light(&last_error) {
            tracing::error!(error = %last_error, "Catalog fetch failed, showing sample catalog");
            return LoadOutcome::Unreachable;
        }

        tracing::warn!(error = %last_error, "Attempting text-only catalog fetch");
        match self.store.select_items(Projection::Light).await {
            Ok(rows) => LoadOutcome::Degraded(ingest_rows(rows, Projection::Light, &self.repair)),
            Err(e) => {
                tracing::error!(error = %e, "Text-only catalog fetch failed, showing sample catalog");
                LoadOutcome::Unreachable
            }
        }
    }

    // ========== Mutations ==========

    /// Add an item to the front of the catalog.
    ///
    /// Returns the item as held locally: the store's record when the insert
    /// succeeded, otherwise the draft under a locally generated id.
    pub async fn create_item(&self, draft: CraftItemDraft) -> AppResult<CraftItem> {
        draft.validate()?;
        let _gate = self.write_gate.lock().await;
        let images = self.repair.repair_images(draft.images.clone());

        if self.mode().await.writes_locally() {
            let item = self.insert_local(draft, images).await;
            self.notify(Notice::LocalOnly {
                action: Mutation::Create,
                reason: LocalReason::Offline,
            });
            return Ok(item);
        }

        match self.store.insert_item(&CraftItemWrite::from(&draft)).await {
            Ok(row) => {
                let echoed_images = row.image_url.as_deref().is_some_and(|s| !s.is_empty());
                let mut item = ingest_row(row, &self.repair);
                if !echoed_images {
                    item.images = images;
                }
                self.prepend(item.clone()).await;
                tracing::info!(id = item.id, name = %item.name, "Item created");
                self.notify(Notice::Saved {
                    action: Mutation::Create,
                });
                Ok(item)
            }
            Err(e) => {
                let item = self.insert_local(draft, images).await;
                self.connection_lost(Mutation::Create, item.id, &e).await;
                Ok(item)
            }
        }
    }

    /// Replace an item, locally first, then in the store.
    ///
    /// The local change is kept whether or not the store accepts it.
    pub async fn update_item(&self, item: CraftItem) -> AppResult<()> {
        item.validate()?;
        let _gate = self.write_gate.lock().await;

        let (item, mode) = {
            let mut state = self.state.write().await;
            let pos = state
                .position(item.id)
                .ok_or_else(|| AppError::item_not_found(item.id))?;
            let item = CraftItem {
                images: self.repair.repair_images(item.images),
                ..item
            };
            state.items[pos] = item.clone();
            state.cart.replace(&item);
            (item, state.mode.clone())
        };

        if mode.writes_locally() {
            self.notify(Notice::LocalOnly {
                action: Mutation::Update,
                reason: LocalReason::Offline,
            });
            return Ok(());
        }

        match self
            .store
            .update_item(item.id, &CraftItemWrite::from(&item))
            .await
        {
            Ok(()) => {
                tracing::info!(id = item.id, "Item updated");
                self.notify(Notice::Saved {
                    action: Mutation::Update,
                });
            }
            Err(e) => self.connection_lost(Mutation::Update, item.id, &e).await,
        }
        Ok(())
    }

    /// Remove an item from the catalog, the cart and the wishlist, then
    /// from the store. The caller confirms with the user beforehand.
    pub async fn delete_item(&self, id: ItemId) -> AppResult<()> {
        let _gate = self.write_gate.lock().await;

        let (mode, wishlist) = {
            let mut state = self.state.write().await;
            let pos = state.position(id).ok_or_else(|| AppError::item_not_found(id))?;
            state.items.remove(pos);
            state.cart.remove(id);
            let wishlist = state.wishlist.remove(id).then(|| state.wishlist.clone());
            (state.mode.clone(), wishlist)
        };
        if let Some(wishlist) = wishlist {
            self.persist_wishlist(&wishlist);
        }

        if mode.writes_locally() {
            self.notify(Notice::LocalOnly {
                action: Mutation::Delete,
                reason: LocalReason::Offline,
            });
            return Ok(());
        }

        match self.store.delete_item(id).await {
            Ok(()) => {
                tracing::info!(id, "Item deleted");
                self.notify(Notice::Saved {
                    action: Mutation::Delete,
                });
            }
            Err(e) => self.connection_lost(Mutation::Delete, id, &e).await,
        }
        Ok(())
    }

    async fn insert_local(&self, draft: CraftItemDraft, images: Vec<String>) -> CraftItem {
        let mut state = self.state.write().await;
        let mut id = local_item_id();
        while state.position(id).is_some() {
            id = local_item_id();
        }
        let item = CraftItemDraft { images, ..draft }.into_item(id);
        state.items.insert(0, item.clone());
        tracing::info!(id, name = %item.name, "Item created locally");
        item
    }

    async fn prepend(&self, item: CraftItem) {
        let mut state = self.state.write().await;
        state.items.retain(|i| i.id != item.id);
        state.items.insert(0, item);
    }

    /// A failed write takes the whole session offline
    async fn connection_lost(&self, action: Mutation, id: ItemId, err: &ClientError) {
        tracing::error!(
            id,
            action = ?action,
            error = %err,
            "Store write failed, switching to offline mode"
        );
        self.state.write().await.mode = SyncMode::Offline;
        self.notify(Notice::LocalOnly {
            action,
            reason: LocalReason::ConnectionLost,
        });
    }

    // ========== Selections ==========

    /// Put a catalog item in the cart. `Ok(false)` when already there.
    pub async fn add_to_cart(&self, id: ItemId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let item = state
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| AppError::item_not_found(id))?;
        Ok(state.cart.add(item))
    }

    pub async fn remove_from_cart(&self, id: ItemId) -> bool {
        self.state.write().await.cart.remove(id)
    }

    pub async fn cart_items(&self) -> Vec<CraftItem> {
        self.state.read().await.cart.items().to_vec()
    }

    /// Hand the cart over as an inquiry and empty it
    pub async fn send_inquiry(&self) -> Vec<CraftItem> {
        let items = self.state.write().await.cart.take();
        tracing::info!(count = items.len(), "Inquiry sent");
        items
    }

    /// Flip an id in the wishlist and persist it. Returns the new membership.
    pub async fn toggle_wishlist(&self, id: ItemId) -> bool {
        let _gate = self.write_gate.lock().await;
        let (wished, wishlist) = {
            let mut state = self.state.write().await;
            let wished = state.wishlist.toggle(id);
            (wished, state.wishlist.clone())
        };
        self.persist_wishlist(&wishlist);
        wished
    }

    pub async fn is_wishlisted(&self, id: ItemId) -> bool {
        self.state.read().await.wishlist.contains(id)
    }

    /// Wishlisted catalog items, in catalog order
    pub async fn wishlist_items(&self) -> Vec<CraftItem> {
        let state = self.state.read().await;
        state
            .items
            .iter()
            .filter(|i| state.wishlist.contains(i.id))
            .cloned()
            .collect()
    }

    fn persist_wishlist(&self, wishlist: &Wishlist) {
        if let Err(e) = wishlist.save(self.prefs.as_ref()) {
            tracing::error!(error = %e, "Could not save wishlist");
        }
    }

    fn notify(&self, notice: Notice) {
        tracing::debug!(notice = ?notice, "Catalog notice");
        // No subscribers is fine
        let _ = self.notices.send(notice);
    }
}

fn should_try_light(err: &ClientError) -> bool {
    err.class() == ErrorClass::Transient || err.suggests_lighter_query()
}
