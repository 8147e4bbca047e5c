//! Cache backend transport.
//!
//! [`CacheBackend`] is the minimal contract the store needs from a key-value
//! backend: a liveness check plus TTL'd set and get. Any store with per-key
//! expiry can satisfy it; production uses [`RedisBackend`], tests inject
//! in-memory fakes.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;

/// Error from the raw backend transport.
///
/// Collapsed to a message string: the store converts every operation failure
/// into a miss or no-op, so only the text survives, for logging.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl From<redis::RedisError> for BackendError {
    fn from(err: redis::RedisError) -> Self {
        BackendError(err.to_string())
    }
}

/// Minimal key-value backend contract: liveness, TTL'd write, read.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Verify the backend is alive and answering.
    async fn ping(&self) -> Result<(), BackendError>;

    /// Write `value` under `key` with an expiry of `ttl_secs` seconds.
    async fn set_ex(&self, key: &str, ttl_secs: u64, value: &str) -> Result<(), BackendError>;

    /// Read the value under `key`. `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;
}

/// Redis-backed [`CacheBackend`] over a multiplexed async connection.
///
/// The connection handle is cheap to clone; each operation clones it so
/// concurrent gets and puts never contend on a lock.
pub struct RedisBackend {
    conn: MultiplexedConnection,
}

impl RedisBackend {
    /// Open a connection to the given address (`redis://...`).
    ///
    /// Establishes the connection only; the store follows up with
    /// [`CacheBackend::ping`] before trusting it.
    pub async fn connect(addr: &str) -> Result<Self, BackendError> {
        let client = redis::Client::open(addr)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn ping(&self) -> Result<(), BackendError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: &str) -> Result<(), BackendError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }
}
