// Sweeper End-to-End Tests

use drainq_core::application::{shutdown_channel, CapacitySweeper, IdleSweeper};
use drainq_core::domain::Item;
use drainq_core::port::time_provider::mocks::MockTimeProvider;
use drainq_core::{QueueStore, StoreConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return true;
        }
        sleep(Duration::from_millis(5)).await;
    }
    false
}

#[tokio::test]
async fn test_queue_a_fills_and_is_drained() {
    let store = Arc::new(QueueStore::with_monotonic_clock(StoreConfig::default()).unwrap());
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let sweeper = tokio::spawn(CapacitySweeper::new(store.clone()).run(shutdown_rx));

    for i in 0..9 {
        store.submit("a", Item::from(format!("{}", i))).await.unwrap();
    }
    sleep(Duration::from_millis(20)).await;
    assert_eq!(store.get("a").await.unwrap().length, 9);
    assert_eq!(store.get("a").await.unwrap().purge_count, 0);

    store.submit("a", Item::from("9")).await.unwrap();

    let drained = eventually(|| {
        let store = store.clone();
        async move { store.get("a").await.map(|s| s.length) == Some(0) }
    })
    .await;
    assert!(drained, "queue a was not drained after filling");

    assert_eq!(store.get("a").await.unwrap().purge_count, 1);
    assert_eq!(store.inspect("a", |q| q.is_full_signaled()).await, Some(false));

    shutdown_tx.shutdown();
    sweeper.await.unwrap();
}

#[tokio::test]
async fn test_queue_b_expires_after_idle_threshold() {
    let clock = Arc::new(MockTimeProvider::new(1_700_000_000_000));
    let config = StoreConfig {
        idle_sweep_interval: Duration::from_millis(20),
        ..StoreConfig::default()
    };
    let store = Arc::new(QueueStore::new(config, clock.clone()).unwrap());
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let idle = tokio::spawn(IdleSweeper::new(store.clone()).run(shutdown_rx.clone()));
    let capacity = tokio::spawn(CapacitySweeper::new(store.clone()).run(shutdown_rx));

    store.submit("b", Item::from("lonely")).await.unwrap();
    store.submit("busy", Item::from("1")).await.unwrap();

    clock.advance(Duration::from_secs(29));
    store.submit("busy", Item::from("2")).await.unwrap();
    sleep(Duration::from_millis(60)).await;
    assert_eq!(store.get("b").await.unwrap().length, 1);

    clock.advance(Duration::from_secs(2));
    let expired = eventually(|| {
        let store = store.clone();
        async move { store.get("b").await.map(|s| s.length) == Some(0) }
    })
    .await;
    assert!(expired, "queue b was not expired");

    let b = store.get("b").await.unwrap();
    assert_eq!(b.purge_count, 1);
    assert_eq!(store.inspect("b", |q| q.last_write()).await, Some(None));

    // Written 2s ago: untouched
    let busy = store.get("busy").await.unwrap();
    assert_eq!(busy.length, 2);
    assert_eq!(busy.purge_count, 0);

    shutdown_tx.shutdown();
    idle.await.unwrap();
    capacity.await.unwrap();
}

#[tokio::test]
async fn test_sweepers_stop_on_shutdown() {
    let store = Arc::new(QueueStore::with_monotonic_clock(StoreConfig::default()).unwrap());
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let idle = tokio::spawn(IdleSweeper::new(store.clone()).run(shutdown_rx.clone()));
    let capacity = tokio::spawn(CapacitySweeper::new(store).run(shutdown_rx));

    shutdown_tx.shutdown();

    tokio::time::timeout(Duration::from_secs(1), idle)
        .await
        .expect("idle sweeper did not stop")
        .unwrap();
    tokio::time::timeout(Duration::from_secs(1), capacity)
        .await
        .expect("capacity sweeper did not stop")
        .unwrap();
}
