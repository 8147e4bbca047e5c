//! Per-chat conversation state.

use std::time::Duration;

use moka::sync::Cache;
use serde_json::Value;

use crate::directory::NearbyGedung;

/// Sessions idle longer than this are dropped.
const SESSION_IDLE_SECS: u64 = 6 * 3600;

/// Bounded number of live sessions.
const SESSION_CAPACITY: u64 = 10_000;

/// What the bot remembers about one chat between updates.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Last shared coordinates (latitude, longitude).
    pub coords: Option<(f64, f64)>,
    /// Radius of the last search, in meters.
    pub radius: Option<u32>,
    /// Results of the last search, for the back-to-results view.
    pub results: Vec<NearbyGedung>,
    /// Raw record of the building being browsed, for the back-to-building
    /// recovery view.
    pub current_gedung: Option<Value>,
}

/// Thread-safe session map keyed by chat id.
///
/// Bounded and idle-expired so long-running processes don't accumulate
/// abandoned conversations. An expired session reads as a fresh one; flows
/// treat that as "ask the user to share a location again".
pub struct SessionStore {
    entries: Cache<i64, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(SESSION_CAPACITY)
                .time_to_idle(Duration::from_secs(SESSION_IDLE_SECS))
                .build(),
        }
    }

    /// Snapshot of the session for a chat; fresh default when absent.
    pub fn get(&self, chat_id: i64) -> Session {
        self.entries.get(&chat_id).unwrap_or_default()
    }

    /// Read-modify-write the session for a chat.
    pub fn update(&self, chat_id: i64, mutate: impl FnOnce(&mut Session)) {
        let mut session = self.get(chat_id);
        mutate(&mut session);
        self.entries.insert(chat_id, session);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_session_reads_as_default() {
        let store = SessionStore::new();
        let session = store.get(7);
        assert!(session.coords.is_none());
        assert!(session.results.is_empty());
    }

    #[test]
    fn update_round_trips() {
        let store = SessionStore::new();
        store.update(7, |session| session.coords = Some((-6.2, 106.8)));
        store.update(7, |session| session.radius = Some(500));

        let session = store.get(7);
        assert_eq!(session.coords, Some((-6.2, 106.8)));
        assert_eq!(session.radius, Some(500));
    }

    #[test]
    fn sessions_are_per_chat() {
        let store = SessionStore::new();
        store.update(1, |session| session.radius = Some(5));
        assert!(store.get(2).radius.is_none());
    }
}
