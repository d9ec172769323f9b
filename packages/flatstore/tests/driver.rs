use std::time::Duration;

use flatstore::{EntityStore, StoreConfig};
use flatstore_core::{spawn_flush_driver, TokioClock};

#[tokio::test(start_paused = true)]
async fn test_driver_commits_burst_after_window() {
    let store: EntityStore<String> = EntityStore::with_clock(StoreConfig::default(), TokioClock);
    let driver = spawn_flush_driver(store.entries.clone());
    let mut versions = store.entries.subscribe();

    for key in ["a", "b", "c", "d"] {
        store.entries.set(key, key.to_uppercase());
    }
    assert!(store.entries.get("a").is_placeholder());

    versions.changed().await.unwrap();
    assert_eq!(*versions.borrow_and_update(), 1);
    for key in ["a", "b", "c", "d"] {
        assert_eq!(store.entries.get(key).data(), Some(&key.to_uppercase()));
    }

    driver.abort();
}

#[tokio::test(start_paused = true)]
async fn test_driver_feeds_live_collection() {
    let store: EntityStore<u32> = EntityStore::with_clock(StoreConfig::default(), TokioClock);
    let driver = spawn_flush_driver(store.entries.clone());

    store.collection.set("scores", ["x", "y"]);
    store.entries.set("x", 1);
    tokio::time::sleep(Duration::from_millis(1)).await;

    store.entries.set("y", 2);
    tokio::time::sleep(Duration::from_millis(50)).await;
    let list = store.collection.get("scores").unwrap();
    assert!(list[0].is_ready());
    assert!(list[1].is_placeholder());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(flatstore::to_list(store.collection.get("scores")), vec![1, 2]);

    driver.abort();
}
