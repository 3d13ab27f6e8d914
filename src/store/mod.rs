//! Durable home of the listing corpus between runs.
//!
//! A store is a snapshot: `save` replaces everything `load` would return.
//! One invocation is assumed to own the corpus for its whole load-then-save
//! cycle; concurrent runs on the same file are not guarded against.

mod json;
mod memory;

pub use json::JsonCorpusStore;
pub use memory::MemoryCorpusStore;

use crate::domain::Listing;
use crate::errors::StoreError;

pub trait CorpusStore {
    /// Previously saved listings, or an empty corpus on first run.
    fn load(&self) -> Result<Vec<Listing>, StoreError>;

    /// Replaces the stored corpus with `listings`.
    fn save(&self, listings: &[Listing]) -> Result<(), StoreError>;
}
