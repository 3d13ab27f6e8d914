// src/store/memory.rs

use std::cell::{Cell, RefCell};
use std::io;

use crate::domain::Listing;
use crate::errors::StoreError;
use crate::store::CorpusStore;

/// In-process store, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryCorpusStore {
    listings: RefCell<Vec<Listing>>,
    saves: Cell<usize>,
    fail_saves: bool,
}

impl MemoryCorpusStore {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings: RefCell::new(listings),
            ..Self::default()
        }
    }

    /// A store whose every `save` fails.
    pub fn failing(listings: Vec<Listing>) -> Self {
        Self {
            fail_saves: true,
            ..Self::new(listings)
        }
    }

    pub fn snapshot(&self) -> Vec<Listing> {
        self.listings.borrow().clone()
    }

    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

impl CorpusStore for MemoryCorpusStore {
    fn load(&self) -> Result<Vec<Listing>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, listings: &[Listing]) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Write {
                path: "<memory>".into(),
                source: io::Error::new(io::ErrorKind::Other, "save disabled"),
            });
        }
        *self.listings.borrow_mut() = listings.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
