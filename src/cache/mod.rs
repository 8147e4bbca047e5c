//! Result-cache subsystem.
//!
//! A best-effort, TTL-keyed store for directory records, layered between the
//! bot flows and the origin API:
//!
//! - [`CacheStore`] — connection state machine and get/put contract. Every
//!   failure is absorbed at this boundary: errors become misses (`get`) or
//!   no-ops (`put`), never surface to callers, and flip the store into a
//!   terminal degraded state for the rest of the process.
//!
//! - [`CacheBackend`] — the transport the store speaks to. Production uses
//!   [`RedisBackend`]; tests substitute in-memory fakes.
//!
//! Records are cached exactly as the origin returned them, serialized to a
//! single JSON string blob under the key `"{kind}:{id}"`. Expiry is set per
//! write and enforced by the backend itself — an expired entry is
//! indistinguishable from an absent one.

mod backend;
mod store;

pub use backend::{BackendError, CacheBackend, RedisBackend};
pub use store::{CacheStore, ConnectError, ConnectionState};

use std::fmt;

/// Default time-to-live for cached records, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Category of cached directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A building and its unit listing.
    Gedung,
    /// A single rentable unit.
    Unit,
}

impl EntityKind {
    /// Wire name, used in cache keys and origin URL paths.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Gedung => "gedung",
            EntityKind::Unit => "unit",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the cache store connection.
///
/// The backend address is either a full connection string or a host+port
/// pair; the connection string takes precedence when both are set.
///
/// ```rust
/// # use pandu::cache::CacheConfig;
/// let config = CacheConfig::from_url("redis://localhost:6379").ttl_secs(600);
/// assert_eq!(config.ttl_secs, 600);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Full backend connection string (e.g. `redis://user:pw@host:6379/0`).
    pub url: Option<String>,
    /// Backend host, used with `port` when no `url` is set.
    pub host: Option<String>,
    /// Backend port, used with `host` when no `url` is set.
    pub port: Option<u16>,
    /// Time-to-live applied to every cached record, in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: None,
            port: None,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

impl CacheConfig {
    /// Config from a full connection string.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Config from a host+port pair.
    pub fn from_host_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: Some(host.into()),
            port: Some(port),
            ..Default::default()
        }
    }

    /// Set the record time-to-live in seconds.
    pub fn ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Resolve the backend address. The connection string wins over
    /// host+port; neither configured is a [`ConnectError::MissingAddress`].
    pub fn address(&self) -> Result<String, ConnectError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        match (&self.host, self.port) {
            (Some(host), Some(port)) => Ok(format!("redis://{host}:{port}")),
            _ => Err(ConnectError::MissingAddress),
        }
    }
}

/// Compose the backend key for an entity record.
pub(crate) fn cache_key(kind: EntityKind, id: &str) -> String {
    format!("{}:{id}", kind.as_str())
}
