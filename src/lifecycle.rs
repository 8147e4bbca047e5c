//! Process lifecycle for the cache store.
//!
//! Binds the store's connection lifetime to the host process: connect at
//! start, close at stop, nothing in between. A failing cache must never
//! prevent the bot from starting — connect failures are logged and the
//! process continues with every request falling back to the origin.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::cache::{CacheConfig, CacheStore};

/// Controller state. Strictly linear, driven by exactly two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NotStarted,
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Binds the shared [`CacheStore`]'s connection to process start/stop.
pub struct Lifecycle {
    cache: Arc<CacheStore>,
    config: CacheConfig,
    state: Mutex<LifecycleState>,
}

impl Lifecycle {
    /// Controller for a store and the configuration to connect it with.
    ///
    /// The store itself is constructed by the composition root and shared
    /// by handle; this controller only owns when it is connected.
    pub fn new(cache: Arc<CacheStore>, config: CacheConfig) -> Self {
        Self {
            cache,
            config,
            state: Mutex::new(LifecycleState::NotStarted),
        }
    }

    /// Process start: connect the cache, degrade gracefully on failure.
    pub async fn start(&self) {
        if !self.advance(LifecycleState::NotStarted, LifecycleState::Starting) {
            return;
        }

        info!(ttl_secs = self.config.ttl_secs, "initializing cache");
        match self.cache.connect(&self.config).await {
            Ok(()) => info!("cache ready"),
            Err(err) => {
                warn!(
                    error = %err,
                    "cache unavailable; continuing without it, all requests will hit the origin"
                );
            }
        }

        self.set(LifecycleState::Running);
    }

    /// Process stop: release the cache connection.
    pub async fn stop(&self) {
        if !self.advance(LifecycleState::Running, LifecycleState::Stopping) {
            return;
        }

        self.cache.close().await;
        self.set(LifecycleState::Stopped);
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock().expect("lifecycle state lock poisoned")
    }

    /// Move `from -> to`; an out-of-order event is logged and ignored.
    fn advance(&self, from: LifecycleState, to: LifecycleState) -> bool {
        let mut state = self.state.lock().expect("lifecycle state lock poisoned");
        if *state != from {
            warn!(current = ?*state, requested = ?to, "lifecycle event out of order; ignored");
            return false;
        }
        *state = to;
        true
    }

    fn set(&self, to: LifecycleState) {
        *self.state.lock().expect("lifecycle state lock poisoned") = to;
    }
}
