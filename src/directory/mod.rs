//! Directory origin API.
//!
//! The directory service owns building ("gedung") and unit records and the
//! geospatial nearby search. [`DirectoryApi`] is the contract the bot needs
//! from it; [`DirectoryClient`] is the HTTP implementation and
//! [`CachedDirectory`] layers the result cache in front of the detail
//! endpoints.

mod cached;
mod client;

pub use cached::CachedDirectory;
pub use client::DirectoryClient;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::Result;
use crate::cache::EntityKind;

/// Operations the bot consumes from the directory service.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Geospatial search for buildings within `radius` meters.
    async fn nearby(&self, lat: f64, long: f64, radius: u32) -> Result<NearbySearch>;

    /// Fetch a building or unit record by id.
    ///
    /// Returns the raw JSON record so callers can cache it verbatim.
    async fn detail(&self, kind: EntityKind, id: &str) -> Result<Value>;
}

/// Response of the nearby search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearch {
    pub success: bool,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub radius: u32,
    #[serde(default)]
    pub results: Vec<NearbyGedung>,
}

/// One building row in the nearby search results.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyGedung {
    pub uuid: String,
    pub nama_gedung: String,
    #[serde(default)]
    pub alamat: Option<String>,
    pub distance: f64,
    #[serde(default)]
    pub total_units: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_search_deserializes_with_defaults() {
        let search: NearbySearch = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(search.success);
        assert_eq!(search.count, 0);
        assert!(search.results.is_empty());
    }

    #[test]
    fn nearby_gedung_tolerates_missing_alamat() {
        let row: NearbyGedung = serde_json::from_str(
            r#"{"uuid": "g1", "nama_gedung": "Menara A", "distance": 42.5, "total_units": 3}"#,
        )
        .unwrap();
        assert_eq!(row.nama_gedung, "Menara A");
        assert!(row.alamat.is_none());
    }
}
