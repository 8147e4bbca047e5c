//! Tests for [`Lifecycle`] — the strictly linear start/stop machine and the
//! "a failing cache never stops the process" contract.

use std::sync::Arc;

use pandu::cache::{CacheConfig, CacheStore, ConnectionState};
use pandu::{Lifecycle, LifecycleState};

#[tokio::test]
async fn start_without_cache_address_runs_degraded() {
    let cache = Arc::new(CacheStore::new());
    let lifecycle = Lifecycle::new(Arc::clone(&cache), CacheConfig::default());

    lifecycle.start().await;

    // The process runs; only the cache is out of play.
    assert_eq!(lifecycle.state(), LifecycleState::Running);
    assert_eq!(cache.state().await, ConnectionState::Degraded);
}

#[tokio::test]
async fn start_with_unreachable_backend_runs_degraded() {
    let cache = Arc::new(CacheStore::new());
    // Nothing listens here.
    let config = CacheConfig::from_url("redis://127.0.0.1:9");
    let lifecycle = Lifecycle::new(Arc::clone(&cache), config);

    lifecycle.start().await;

    assert_eq!(lifecycle.state(), LifecycleState::Running);
    assert_eq!(cache.state().await, ConnectionState::Degraded);
}

#[tokio::test]
async fn stop_closes_the_store() {
    let cache = Arc::new(CacheStore::new());
    let lifecycle = Lifecycle::new(Arc::clone(&cache), CacheConfig::default());

    lifecycle.start().await;
    lifecycle.stop().await;

    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    assert_eq!(cache.state().await, ConnectionState::Uninitialized);
}

#[tokio::test]
async fn stop_before_start_is_ignored() {
    let cache = Arc::new(CacheStore::new());
    let lifecycle = Lifecycle::new(Arc::clone(&cache), CacheConfig::default());

    lifecycle.stop().await;
    assert_eq!(lifecycle.state(), LifecycleState::NotStarted);

    // The ignored event does not poison the machine.
    lifecycle.start().await;
    assert_eq!(lifecycle.state(), LifecycleState::Running);
}

#[tokio::test]
async fn duplicate_events_are_ignored() {
    let cache = Arc::new(CacheStore::new());
    let lifecycle = Lifecycle::new(Arc::clone(&cache), CacheConfig::default());

    lifecycle.start().await;
    lifecycle.start().await;
    assert_eq!(lifecycle.state(), LifecycleState::Running);

    lifecycle.stop().await;
    lifecycle.stop().await;
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
}
