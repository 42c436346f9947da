//! Scripted in-memory catalog store for controller tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use craft_client::store::{CatalogStore, Projection};
use craft_client::{
    CatalogSync, ClientError, ClientResult, MemoryPreferenceStore, Notice, PreferenceStore,
    RepairPolicy,
};
use rust_decimal::Decimal;
use shared::models::{CraftItemRow, CraftItemWrite, ItemId};
use tokio::sync::{Notify, broadcast};
use tokio::time::Instant;

pub const PLACEHOLDER: &str = "placeholder.png";

/// Scripted outcome of a select
#[derive(Debug, Clone)]
pub enum Reply {
    Rows(Vec<CraftItemRow>),
    Fail(&'static str, &'static str),
}

impl Reply {
    fn produce(&self) -> ClientResult<Vec<CraftItemRow>> {
        match self {
            Reply::Rows(rows) => Ok(rows.clone()),
            Reply::Fail(code, message) => Err(ClientError::store(*code, *message)),
        }
    }
}

pub fn transient() -> Reply {
    Reply::Fail("500", "Internal Server Error")
}

pub fn network_down() -> Reply {
    Reply::Fail("", "TypeError: Failed to fetch")
}

pub fn missing_table() -> Reply {
    Reply::Fail("42P01", "relation \"public.craft_items\" does not exist")
}

pub fn forbidden() -> Reply {
    Reply::Fail("42501", "permission denied for table craft_items")
}

pub fn payload_too_large() -> Reply {
    Reply::Fail("413", "Payload Too Large")
}

/// Store call, in the order received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    SelectFull,
    SelectLight,
    Insert,
    Update(ItemId),
    Delete(ItemId),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(self, Call::Insert | Call::Update(_) | Call::Delete(_))
    }
}

pub struct ScriptedStore {
    full_queue: Mutex<VecDeque<Reply>>,
    full_default: Mutex<Reply>,
    light: Mutex<Reply>,
    write_failure: Mutex<Option<(&'static str, &'static str)>>,
    echo_images: Mutex<bool>,
    next_id: AtomicI64,
    calls: Mutex<Vec<(Call, Instant)>>,
    select_hold: Mutex<Option<Arc<Notify>>>,
    write_delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self {
            full_queue: Mutex::new(VecDeque::new()),
            full_default: Mutex::new(Reply::Rows(Vec::new())),
            light: Mutex::new(Reply::Rows(Vec::new())),
            write_failure: Mutex::new(None),
            echo_images: Mutex::new(true),
            next_id: AtomicI64::new(100),
            calls: Mutex::new(Vec::new()),
            select_hold: Mutex::new(None),
            write_delay: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Catalog served once the queue is drained
    pub fn serve(rows: Vec<CraftItemRow>) -> Self {
        let store = Self::new();
        store.set_full(Reply::Rows(rows));
        store
    }

    pub fn set_full(&self, reply: Reply) {
        *self.full_default.lock().unwrap() = reply;
    }

    /// Reply to the next full select only
    pub fn queue_full(&self, reply: Reply) {
        self.full_queue.lock().unwrap().push_back(reply);
    }

    pub fn set_light(&self, reply: Reply) {
        *self.light.lock().unwrap() = reply;
    }

    pub fn fail_writes(&self, code: &'static str, message: &'static str) {
        *self.write_failure.lock().unwrap() = Some((code, message));
    }

    /// Make inserts return rows without an `imageUrl`
    pub fn strip_insert_images(&self) {
        *self.echo_images.lock().unwrap() = false;
    }

    /// Block selects until the returned handle is notified
    pub fn hold_selects(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.select_hold.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn slow_writes(&self, delay: Duration) {
        *self.write_delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().iter().map(|(c, _)| *c).collect()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().into_iter().filter(|c| *c == call).count()
    }

    pub fn writes(&self) -> usize {
        self.calls().into_iter().filter(Call::is_write).count()
    }

    /// Times at which full selects arrived
    pub fn full_select_times(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == Call::SelectFull)
            .map(|(_, t)| *t)
            .collect()
    }

    pub fn max_concurrent_writes(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((call, Instant::now()));
    }

    async fn write(&self, call: Call) -> ClientResult<()> {
        self.record(call);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.write_delay.lock().unwrap();
        match delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let failure = *self.write_failure.lock().unwrap();
        match failure {
            Some((code, message)) => Err(ClientError::store(code, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CatalogStore for ScriptedStore {
    async fn select_items(&self, projection: Projection) -> ClientResult<Vec<CraftItemRow>> {
        let hold = self.select_hold.lock().unwrap().clone();
        match projection {
            Projection::Full => {
                self.record(Call::SelectFull);
                if let Some(hold) = hold {
                    hold.notified().await;
                }
                let queued = self.full_queue.lock().unwrap().pop_front();
                match queued {
                    Some(reply) => reply.produce(),
                    None => self.full_default.lock().unwrap().produce(),
                }
            }
            Projection::Light => {
                self.record(Call::SelectLight);
                let rows = self.light.lock().unwrap().produce()?;
                Ok(rows
                    .into_iter()
                    .map(|row| CraftItemRow {
                        image_url: None,
                        ..row
                    })
                    .collect())
            }
        }
    }

    async fn insert_item(&self, item: &CraftItemWrite) -> ClientResult<CraftItemRow> {
        self.write(Call::Insert).await?;
        let echo_images = *self.echo_images.lock().unwrap();
        Ok(CraftItemRow {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: Some(item.name.clone()),
            description: Some(item.description.clone()),
            price: Some(item.price),
            image_url: echo_images.then(|| item.image_url.clone()),
            category: Some(item.category.to_string()),
            model_url: item.model_url.clone(),
        })
    }

    async fn update_item(&self, id: ItemId, _item: &CraftItemWrite) -> ClientResult<()> {
        self.write(Call::Update(id)).await
    }

    async fn delete_item(&self, id: ItemId) -> ClientResult<()> {
        self.write(Call::Delete(id)).await
    }
}

pub fn row(id: ItemId, name: &str, image_url: Option<&str>) -> CraftItemRow {
    CraftItemRow {
        id,
        name: Some(name.to_string()),
        description: Some(format!("{} description", name)),
        price: Some(Decimal::new(1200 + id, 2)),
        image_url: image_url.map(str::to_string),
        category: Some("Decor".to_string()),
        model_url: None,
    }
}

pub fn repair_policy() -> RepairPolicy {
    RepairPolicy {
        placeholder_image: PLACEHOLDER.to_string(),
        ..RepairPolicy::default()
    }
}

pub fn sync_with(store: Arc<ScriptedStore>) -> CatalogSync {
    sync_with_prefs(store, Arc::new(MemoryPreferenceStore::new()))
}

pub fn sync_with_prefs(store: Arc<ScriptedStore>, prefs: Arc<dyn PreferenceStore>) -> CatalogSync {
    CatalogSync::new(store, prefs).with_repair(repair_policy())
}

/// Drain every notice received so far
pub fn drain(rx: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}
