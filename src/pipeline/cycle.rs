// src/pipeline/cycle.rs

use tracing::info;

use crate::domain::{FilterCriteria, Listing};
use crate::errors::StoreError;
use crate::pipeline::filter::filter_batch;
use crate::pipeline::identity::IdentityResolver;
use crate::pipeline::merge::merge;
use crate::pipeline::rank::rank;
use crate::store::CorpusStore;

/// Result of one filter-merge-rank-save cycle.
#[derive(Debug)]
pub struct CycleReport {
    /// The ranked corpus exactly as it was saved.
    pub listings: Vec<Listing>,
    pub raw: usize,
    pub accepted: usize,
    pub existing: usize,
    pub duplicates_dropped: usize,
}

impl CycleReport {
    pub fn total(&self) -> usize {
        self.listings.len()
    }
}

/// Runs one batch through the whole pipeline and persists the outcome.
///
/// Bad records only ever drop out of the batch. A failed save is returned
/// to the caller: the run is not successful if the corpus wasn't written.
pub fn run_cycle(
    store: &dyn CorpusStore,
    raw_batch: Vec<Listing>,
    criteria: &FilterCriteria,
    resolver: &IdentityResolver,
) -> Result<CycleReport, StoreError> {
    let raw = raw_batch.len();
    let accepted = filter_batch(raw_batch, criteria);
    let accepted_len = accepted.len();

    let existing = store.load()?;
    let outcome = merge(existing, accepted, resolver);
    let listings = rank(outcome.listings);

    store.save(&listings)?;

    info!(
        raw,
        accepted = accepted_len,
        existing = outcome.existing,
        duplicates_dropped = outcome.duplicates_dropped,
        total = listings.len(),
        "cycle complete"
    );

    Ok(CycleReport {
        listings,
        raw,
        accepted: accepted_len,
        existing: outcome.existing,
        duplicates_dropped: outcome.duplicates_dropped,
    })
}
