//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::{Value, json};

use pandu::cache::{BackendError, CacheBackend, CacheStore, EntityKind};
use pandu::directory::{CachedDirectory, DirectoryApi, NearbySearch};
use pandu::telemetry;
use pandu::{PanduError, Result};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Default)]
struct PlainBackend {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl CacheBackend for PlainBackend {
    async fn ping(&self) -> std::result::Result<(), BackendError> {
        Ok(())
    }

    async fn set_ex(
        &self,
        key: &str,
        _ttl_secs: u64,
        value: &str,
    ) -> std::result::Result<(), BackendError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> std::result::Result<Option<String>, BackendError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }
}

struct FailingOrigin;

#[async_trait]
impl DirectoryApi for FailingOrigin {
    async fn nearby(&self, _: f64, _: f64, _: u32) -> Result<NearbySearch> {
        Err(PanduError::Http("down".into()))
    }

    async fn detail(&self, _: EntityKind, _: &str) -> Result<Value> {
        Err(PanduError::Api {
            status: 500,
            message: "down".into(),
        })
    }
}

struct ServingOrigin;

#[async_trait]
impl DirectoryApi for ServingOrigin {
    async fn nearby(&self, _: f64, _: f64, radius: u32) -> Result<NearbySearch> {
        Ok(NearbySearch {
            success: true,
            count: 0,
            radius,
            results: vec![],
        })
    }

    async fn detail(&self, _: EntityKind, _: &str) -> Result<Value> {
        Ok(json!({"uuid": "g1"}))
    }
}

// ============================================================================
// Snapshot helpers
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum all counter values matching a metric name and label pair.
fn counter_total(snapshot: &SnapshotVec, name: &str, label: (&str, &str)) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label.0 && l.value() == label.1)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
fn with_recorder<T>(recorder: &DebuggingRecorder, work: impl Future<Output = T>) -> T {
    metrics::with_local_recorder(recorder, || {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(work))
    })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_miss_then_hit_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    with_recorder(&recorder, async {
        let store = CacheStore::new();
        store
            .attach(Arc::new(PlainBackend::default()), 3600)
            .await
            .unwrap();

        store.get(EntityKind::Gedung, "g1").await; // miss
        store
            .put(EntityKind::Gedung, "g1", &json!({"a": 1}), 3600)
            .await;
        store.get(EntityKind::Gedung, "g1").await; // hit
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL, ("kind", "gedung")),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL, ("kind", "gedung")),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn degraded_lookups_count_as_misses() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    with_recorder(&recorder, async {
        let store = CacheStore::new();
        store.get(EntityKind::Unit, "u1").await;
        store.get(EntityKind::Unit, "u1").await;
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL, ("kind", "unit")),
        2
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn origin_success_and_failure_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    with_recorder(&recorder, async {
        let ok = CachedDirectory::new(Arc::new(ServingOrigin), Arc::new(CacheStore::new()));
        ok.fetch(EntityKind::Gedung, "g1").await.unwrap();

        let down = CachedDirectory::new(Arc::new(FailingOrigin), Arc::new(CacheStore::new()));
        let _ = down.fetch(EntityKind::Gedung, "g1").await;
        let _ = down.nearby(0.0, 0.0, 5).await;
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(&snapshot, telemetry::ORIGIN_REQUESTS_TOTAL, ("status", "ok")),
        1
    );
    assert_eq!(
        counter_total(
            &snapshot,
            telemetry::ORIGIN_REQUESTS_TOTAL,
            ("status", "error")
        ),
        2
    );
}
