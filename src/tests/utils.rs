use crate::domain::{Listing, Source};
use crate::store::JsonCorpusStore;
use tempfile::TempDir;

/// A fresh corpus file in its own temp directory. Keep the `TempDir` alive.
pub fn temp_store() -> (TempDir, JsonCorpusStore) {
    let dir = TempDir::new().unwrap_or_else(|e| panic!("temp dir creation failed: {e}"));
    let store = JsonCorpusStore::new(dir.path().join("data.json"));
    (dir, store)
}

pub fn listing(source: Source, address: &str, rent: &str, rooms: &str) -> Listing {
    Listing::new(source, address, rent, rooms)
        .with_extra("Quartier", "Geneve")
        .with_extra("URL", format!("https://example.ch/{}", address.replace(' ', "-")))
}
