// craft-client/tests/sync_load.rs
// Catalog load: retry, degraded fetch and fallbacks

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use craft_client::sample::sample_catalog;
use craft_client::{Notice, SyncMode};

#[tokio::test]
async fn test_full_fetch_goes_online_and_repairs_images() {
    let store = Arc::new(ScriptedStore::serve(vec![
        row(3, "Bear", Some(r#"["https://i.ibb.co/bear.png","https://cdn.example.com/bear2.jpg"]"#)),
        row(2, "Vase", Some("https://cdn.example.com/vase.jpg")),
        row(1, "Bag", None),
    ]));
    let sync = sync_with(store.clone());
    let mut rx = sync.subscribe();

    assert_eq!(sync.load_catalog().await, SyncMode::Online);

    let items = sync.items().await;
    let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(
        items[0].images,
        vec![PLACEHOLDER, "https://cdn.example.com/bear2.jpg"]
    );
    assert_eq!(items[1].images, vec!["https://cdn.example.com/vase.jpg"]);
    assert_eq!(items[2].images, vec![PLACEHOLDER]);

    assert_eq!(store.calls(), vec![Call::SelectFull]);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_retry_eight_times_then_go_offline() {
    let store = Arc::new(ScriptedStore::new());
    store.set_full(transient());
    store.set_light(transient());
    let sync = sync_with(store.clone());
    let mut rx = sync.subscribe();

    assert_eq!(sync.load_catalog().await, SyncMode::Offline);

    assert_eq!(store.count(Call::SelectFull), 9);
    assert_eq!(store.count(Call::SelectLight), 1);
    assert_eq!(store.calls().last(), Some(&Call::SelectLight));

    let times = store.full_select_times();
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(3500));
    }

    assert_eq!(sync.items().await, sample_catalog(&repair_policy()));
    assert_eq!(drain(&mut rx), vec![Notice::CatalogUnavailable]);
}

#[tokio::test(start_paused = true)]
async fn test_recovers_mid_retry() {
    let store = Arc::new(ScriptedStore::serve(vec![row(1, "Bag", None)]));
    store.queue_full(network_down());
    store.queue_full(transient());
    store.queue_full(Reply::Fail("57014", "canceling statement due to statement timeout"));
    let sync = sync_with(store.clone());

    assert_eq!(sync.load_catalog().await, SyncMode::Online);
    assert_eq!(store.count(Call::SelectFull), 4);
    assert_eq!(store.count(Call::SelectLight), 0);
    assert_eq!(sync.items().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_degraded_fetch_after_retries() {
    let store = Arc::new(ScriptedStore::new());
    store.set_full(network_down());
    store.set_light(Reply::Rows(vec![
        row(2, "Vase", Some("https://cdn.example.com/vase.jpg")),
        row(1, "Bag", None),
    ]));
    let sync = sync_with(store.clone());
    let mut rx = sync.subscribe();

    assert_eq!(sync.load_catalog().await, SyncMode::Online);
    assert_eq!(store.count(Call::SelectFull), 9);
    assert_eq!(store.count(Call::SelectLight), 1);

    let items = sync.items().await;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.images == vec![PLACEHOLDER]));
    assert_eq!(drain(&mut rx), vec![Notice::DegradedCatalog]);
}

#[tokio::test]
async fn test_missing_table_is_fatal_without_retry() {
    let store = Arc::new(ScriptedStore::new());
    store.set_full(missing_table());
    let sync = sync_with(store.clone());
    let mut rx = sync.subscribe();

    let mode = sync.load_catalog().await;
    assert_eq!(mode, SyncMode::FatalError("missing backing store".to_string()));
    assert!(sync.mode().await.is_fatal());
    assert_eq!(store.calls(), vec![Call::SelectFull]);
    assert_eq!(sync.items().await, sample_catalog(&repair_policy()));
    assert_eq!(drain(&mut rx), vec![Notice::MissingBackingStore]);
}

#[tokio::test]
async fn test_other_errors_skip_retry_and_light_fetch() {
    let store = Arc::new(ScriptedStore::new());
    store.set_full(forbidden());
    let sync = sync_with(store.clone());

    assert_eq!(sync.load_catalog().await, SyncMode::Offline);
    assert_eq!(store.calls(), vec![Call::SelectFull]);
    assert_eq!(sync.items().await, sample_catalog(&repair_policy()));
}

#[tokio::test]
async fn test_oversized_payload_goes_straight_to_light_fetch() {
    let store = Arc::new(ScriptedStore::new());
    store.set_full(payload_too_large());
    store.set_light(Reply::Rows(vec![row(5, "Lamp", None)]));
    let sync = sync_with(store.clone());

    assert_eq!(sync.load_catalog().await, SyncMode::Online);
    assert_eq!(store.calls(), vec![Call::SelectFull, Call::SelectLight]);
}

#[tokio::test]
async fn test_degraded_fetch_discards_previously_loaded_images() {
    let store = Arc::new(ScriptedStore::serve(vec![row(
        1,
        "Bag",
        Some("https://cdn.example.com/bag.jpg"),
    )]));
    let sync = sync_with(store.clone());
    sync.load_catalog().await;
    assert_eq!(
        sync.item(1).await.unwrap().images,
        vec!["https://cdn.example.com/bag.jpg"]
    );

    store.set_full(payload_too_large());
    store.set_light(Reply::Rows(vec![row(1, "Bag", None)]));
    assert_eq!(sync.retry_connection().await, SyncMode::Online);
    assert_eq!(sync.item(1).await.unwrap().images, vec![PLACEHOLDER]);
}

#[tokio::test]
async fn test_retry_connection_recovers_from_offline() {
    let store = Arc::new(ScriptedStore::new());
    store.set_full(forbidden());
    let sync = sync_with(store.clone());
    assert_eq!(sync.load_catalog().await, SyncMode::Offline);

    store.set_full(Reply::Rows(vec![row(8, "Scarf", None)]));
    assert_eq!(sync.retry_connection().await, SyncMode::Online);
    let ids: Vec<i64> = sync.items().await.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![8]);
}

#[tokio::test]
async fn test_concurrent_load_is_rejected() {
    let store = Arc::new(ScriptedStore::serve(vec![row(1, "Bag", None)]));
    let release = store.hold_selects();
    let sync = Arc::new(sync_with(store.clone()));

    let first = tokio::spawn({
        let sync = sync.clone();
        async move { sync.load_catalog().await }
    });
    while store.count(Call::SelectFull) == 0 {
        tokio::task::yield_now().await;
    }
    assert!(sync.is_loading());

    // Second caller sees the load in progress and leaves the store alone
    assert_eq!(sync.load_catalog().await, SyncMode::Loading);
    assert_eq!(store.count(Call::SelectFull), 1);

    release.notify_one();
    assert_eq!(first.await.unwrap(), SyncMode::Online);
    assert!(!sync.is_loading());
    assert_eq!(store.count(Call::SelectFull), 1);
}

#[tokio::test]
async fn test_new_session_starts_loading_and_empty() {
    let sync = sync_with(Arc::new(ScriptedStore::new()));
    assert_eq!(sync.mode().await, SyncMode::Loading);
    assert!(sync.items().await.is_empty());
}
