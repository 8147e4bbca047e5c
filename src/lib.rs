//! Pandu - Telegram front-end for nearby buildings and rentable units
//!
//! A user shares a location, picks a search radius, and browses the
//! buildings ("gedung") and units the directory service knows about. Detail
//! lookups go through a best-effort Redis result cache: hits skip the origin
//! entirely, misses fall back to the origin and warm the cache, and a broken
//! cache backend degrades the process to origin-only operation instead of
//! failing it.
//!
//! # Read-through example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pandu::cache::{CacheConfig, CacheStore};
//! use pandu::directory::{CachedDirectory, DirectoryClient};
//! use pandu::EntityKind;
//!
//! #[tokio::main]
//! async fn main() -> pandu::Result<()> {
//!     let cache = Arc::new(CacheStore::new());
//!     // A failed connect leaves the store degraded; fetches still work.
//!     let _ = cache
//!         .connect(&CacheConfig::from_url("redis://localhost:6379"))
//!         .await;
//!
//!     let origin = Arc::new(DirectoryClient::new("https://directory.example/api", "key"));
//!     let directory = CachedDirectory::new(origin, cache);
//!
//!     let gedung = directory.fetch(EntityKind::Gedung, "uuid-1234").await?;
//!     println!("{gedung}");
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod cache;
pub mod chat;
pub mod directory;
pub mod error;
pub mod lifecycle;
pub mod telemetry;

// Re-export main types at crate root
pub use bot::{Bot, Session, SessionStore};
pub use cache::{CacheConfig, CacheStore, ConnectionState, EntityKind};
pub use chat::TelegramClient;
pub use directory::{CachedDirectory, DirectoryClient};
pub use error::{PanduError, Result};
pub use lifecycle::{Lifecycle, LifecycleState};
