//! Best-effort TTL store for directory records.
//!
//! The store owns the backend connection and a three-state machine:
//! `Uninitialized` before the first connect attempt, `Connected` after a
//! verified connect, `Degraded` after any connect or operation failure.
//! Degraded is terminal for the process lifetime — no reconnect is attempted
//! between lifecycle boundaries, every subsequent `get` reports a miss and
//! every `put` reports "not saved".
//!
//! Nothing raised by the backend escapes this module. That is the contract
//! the read-through accessor is written against: the rest of the system can
//! behave as if the cache always exists.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::backend::{CacheBackend, RedisBackend};
use super::{CacheConfig, DEFAULT_TTL_SECS, EntityKind, cache_key};
use crate::telemetry;

/// Error from [`CacheStore::connect`]. Leaves the store degraded; the caller
/// is expected to log and continue rather than abort the process.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("cache backend address not configured (set a connection string or host+port)")]
    MissingAddress,

    #[error("cache backend connection failed: {0}")]
    Connection(String),

    #[error("cache backend liveness check failed: {0}")]
    Liveness(String),
}

/// Observable connection state. Exposed for logs and tests; operations
/// themselves never raise on a bad state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connected,
    Degraded,
}

enum Conn {
    Uninitialized,
    Connected(Arc<dyn CacheBackend>),
    Degraded,
}

struct Inner {
    conn: Conn,
    ttl_secs: u64,
}

/// TTL-keyed record store with graceful degradation.
///
/// Owned by the composition root and shared as `Arc<CacheStore>`. The state
/// is behind an async `RwLock`: `get`/`put` only read it (cloning the backend
/// handle), and the `Connected -> Degraded` flip is idempotent, so concurrent
/// failures racing into `degrade` all land on the same terminal state.
pub struct CacheStore {
    inner: RwLock<Inner>,
}

impl CacheStore {
    /// Create an unconnected store with the default TTL.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                conn: Conn::Uninitialized,
                ttl_secs: DEFAULT_TTL_SECS,
            }),
        }
    }

    /// Connect to the configured backend and verify liveness.
    ///
    /// Resolves the address (connection string wins over host+port), opens
    /// the connection, and pings it. Any failure leaves the store degraded
    /// and returns the error.
    pub async fn connect(&self, config: &CacheConfig) -> Result<(), ConnectError> {
        let addr = match config.address() {
            Ok(addr) => addr,
            Err(err) => {
                self.mark_degraded().await;
                return Err(err);
            }
        };

        let backend = match RedisBackend::connect(&addr).await {
            Ok(backend) => backend,
            Err(err) => {
                self.mark_degraded().await;
                return Err(ConnectError::Connection(err.to_string()));
            }
        };

        self.attach(Arc::new(backend), config.ttl_secs).await
    }

    /// Install an already-constructed backend after verifying liveness.
    ///
    /// `connect` lands here after opening its Redis connection; callers with
    /// their own [`CacheBackend`] (alternative stores, test fakes) use it
    /// directly.
    pub async fn attach(
        &self,
        backend: Arc<dyn CacheBackend>,
        ttl_secs: u64,
    ) -> Result<(), ConnectError> {
        if let Err(err) = backend.ping().await {
            warn!(error = %err, "cache liveness check failed");
            self.mark_degraded().await;
            return Err(ConnectError::Liveness(err.to_string()));
        }

        let mut inner = self.inner.write().await;
        inner.conn = Conn::Connected(backend);
        inner.ttl_secs = ttl_secs;
        info!(ttl_secs, "cache backend connected and verified");
        Ok(())
    }

    /// Release the connection. Never fails; safe when never connected.
    pub async fn close(&self) {
        let mut inner = self.inner.write().await;
        if matches!(inner.conn, Conn::Connected(_)) {
            info!("cache connection closed");
        }
        inner.conn = Conn::Uninitialized;
    }

    /// Current connection state.
    pub async fn state(&self) -> ConnectionState {
        match self.inner.read().await.conn {
            Conn::Uninitialized => ConnectionState::Uninitialized,
            Conn::Connected(_) => ConnectionState::Connected,
            Conn::Degraded => ConnectionState::Degraded,
        }
    }

    /// Configured record TTL in seconds.
    pub async fn ttl_secs(&self) -> u64 {
        self.inner.read().await.ttl_secs
    }

    /// Look up a cached record.
    ///
    /// `None` on miss, on an expired entry, on a corrupt payload, or when
    /// the store is not connected. A backend failure while connected flips
    /// the store to degraded and reports a miss.
    pub async fn get(&self, kind: EntityKind, id: &str) -> Option<Value> {
        let Some(backend) = self.backend().await else {
            self.count_miss(kind);
            return None;
        };

        let key = cache_key(kind, id);
        match backend.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(record) => {
                    debug!(kind = %kind, id, "cache hit");
                    metrics::counter!(telemetry::CACHE_HITS_TOTAL, "kind" => kind.as_str())
                        .increment(1);
                    Some(record)
                }
                // Corrupt payload is a data problem, not a connection
                // problem: report a miss, stay connected.
                Err(err) => {
                    warn!(kind = %kind, id, error = %err, "corrupt cache payload");
                    self.count_miss(kind);
                    None
                }
            },
            Ok(None) => {
                debug!(kind = %kind, id, "cache miss");
                self.count_miss(kind);
                None
            }
            Err(err) => {
                self.degrade("get", &err).await;
                self.count_miss(kind);
                None
            }
        }
    }

    /// Store a record verbatim under `"{kind}:{id}"` with the given expiry.
    ///
    /// `false` on any failure, including a store that is not connected; any
    /// failure leaves the store degraded.
    pub async fn put(&self, kind: EntityKind, id: &str, record: &Value, ttl_secs: u64) -> bool {
        let Some(backend) = self.backend().await else {
            return false;
        };

        let raw = match serde_json::to_string(record) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(kind = %kind, id, error = %err, "unserializable record");
                self.mark_degraded().await;
                return false;
            }
        };

        let key = cache_key(kind, id);
        match backend.set_ex(&key, ttl_secs, &raw).await {
            Ok(()) => {
                debug!(kind = %kind, id, ttl_secs, "cached record");
                true
            }
            Err(err) => {
                self.degrade("put", &err).await;
                false
            }
        }
    }

    /// Clone the backend handle when connected.
    async fn backend(&self) -> Option<Arc<dyn CacheBackend>> {
        match &self.inner.read().await.conn {
            Conn::Connected(backend) => Some(Arc::clone(backend)),
            _ => None,
        }
    }

    /// Flip `Connected -> Degraded` after an operation failure. Idempotent:
    /// losing the race to another failure changes nothing.
    async fn degrade(&self, op: &'static str, err: &super::BackendError) {
        let mut inner = self.inner.write().await;
        if matches!(inner.conn, Conn::Connected(_)) {
            warn!(
                op,
                error = %err,
                "cache backend failure; store degraded for the rest of the process"
            );
            inner.conn = Conn::Degraded;
        }
    }

    /// Force the degraded state, regardless of the current one.
    async fn mark_degraded(&self) {
        self.inner.write().await.conn = Conn::Degraded;
    }

    fn count_miss(&self, kind: EntityKind) {
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "kind" => kind.as_str()).increment(1);
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}
