//! Read-through accessor over the directory detail endpoints.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{DirectoryApi, NearbySearch};
use crate::Result;
use crate::cache::{CacheStore, EntityKind};
use crate::telemetry;

/// Directory handle that keeps the result cache warm.
///
/// Detail fetches consult the cache first; a hit never contacts the origin.
/// On a miss the record comes from the origin and is written back
/// best-effort — a failed write degrades the store but never fails the
/// fetch. Only origin failures surface to callers.
pub struct CachedDirectory {
    origin: Arc<dyn DirectoryApi>,
    cache: Arc<CacheStore>,
}

impl CachedDirectory {
    pub fn new(origin: Arc<dyn DirectoryApi>, cache: Arc<CacheStore>) -> Self {
        Self { origin, cache }
    }

    /// Fetch a building or unit record, preferring the cache.
    pub async fn fetch(&self, kind: EntityKind, id: &str) -> Result<Value> {
        if let Some(record) = self.cache.get(kind, id).await {
            return Ok(record);
        }

        let record = self.origin_call(kind.as_str(), self.origin.detail(kind, id)).await?;

        // Fire-and-forget write-back; the store logs its own failures.
        let ttl_secs = self.cache.ttl_secs().await;
        if self.cache.put(kind, id, &record, ttl_secs).await {
            debug!(kind = %kind, id, "warmed cache from origin");
        }

        Ok(record)
    }

    /// Geospatial search, passed straight through to the origin.
    ///
    /// Results depend on the caller's coordinates and radius, so they are
    /// not cached.
    pub async fn nearby(&self, lat: f64, long: f64, radius: u32) -> Result<NearbySearch> {
        self.origin_call("nearby", self.origin.nearby(lat, long, radius))
            .await
    }

    async fn origin_call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match fut.await {
            Ok(value) => {
                metrics::counter!(
                    telemetry::ORIGIN_REQUESTS_TOTAL,
                    "operation" => operation,
                    "status" => "ok"
                )
                .increment(1);
                Ok(value)
            }
            Err(err) => {
                metrics::counter!(
                    telemetry::ORIGIN_REQUESTS_TOTAL,
                    "operation" => operation,
                    "status" => "error"
                )
                .increment(1);
                Err(err)
            }
        }
    }
}
