// src/pipeline/merge.rs

use std::cmp::Reverse;

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::domain::Listing;
use crate::pipeline::identity::{IdentityResolver, Priority};

/// Survivors of a merge plus what happened on the way.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Deduplicated, not yet ranked.
    pub listings: Vec<Listing>,
    pub existing: usize,
    pub incoming: usize,
    pub duplicates_dropped: usize,
}

/// Combines the persisted corpus with a new batch, one listing per address.
///
/// `existing ++ incoming` is stable-sorted by priority, highest first, then
/// scanned once. The first listing under a key is kept unless a later one of
/// the same priority shows up, which replaces it. A lower-priority listing
/// never displaces a higher one, whatever the input order.
pub fn merge(
    existing: Vec<Listing>,
    incoming: Vec<Listing>,
    resolver: &IdentityResolver,
) -> MergeOutcome {
    let existing_len = existing.len();
    let incoming_len = incoming.len();

    let mut working = existing;
    working.extend(incoming);
    working.sort_by_key(|listing| Reverse(resolver.priority_of(listing)));

    let mut by_key: IndexMap<String, (Priority, Listing)> = IndexMap::with_capacity(working.len());
    let mut duplicates_dropped = 0;

    for listing in working {
        let priority = resolver.priority_of(&listing);
        match by_key.entry(resolver.key_of(&listing)) {
            Entry::Vacant(slot) => {
                slot.insert((priority, listing));
            }
            Entry::Occupied(mut slot) => {
                duplicates_dropped += 1;
                if slot.get().0 == priority {
                    debug!(
                        key = %slot.key(),
                        kept = %listing.source,
                        dropped = %slot.get().1.source,
                        "duplicate replaced by later listing"
                    );
                    slot.insert((priority, listing));
                } else {
                    debug!(
                        key = %slot.key(),
                        kept = %slot.get().1.source,
                        dropped = %listing.source,
                        "duplicate dropped in favour of preferred source"
                    );
                }
            }
        }
    }

    let listings: Vec<Listing> = by_key.into_values().map(|(_, listing)| listing).collect();

    info!(
        existing = existing_len,
        incoming = incoming_len,
        duplicates_dropped,
        total = listings.len(),
        "merged listings"
    );

    MergeOutcome {
        listings,
        existing: existing_len,
        incoming: incoming_len,
        duplicates_dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;
    use std::collections::HashSet;

    fn listing(source: Source, address: &str, rent: &str) -> Listing {
        Listing::new(source, address, rent, "2")
    }

    fn resolver() -> IdentityResolver {
        IdentityResolver::default()
    }

    #[test]
    fn preferred_source_wins_cross_portal_collision() {
        let existing = vec![listing(Source::Homegate, "Rue de Lyon 5", "1200")];
        let incoming = vec![listing(Source::ImmoScout24, "rue de lyon 5 ", "1250")];

        let out = merge(existing, incoming, &resolver());

        assert_eq!(out.listings.len(), 1);
        assert_eq!(out.listings[0].source, Source::ImmoScout24);
        assert_eq!(out.listings[0].rent, "1250");
        assert_eq!(out.duplicates_dropped, 1);
    }

    #[test]
    fn preferred_source_wins_regardless_of_input_order() {
        let scout = listing(Source::ImmoScout24, "Boulevard Carl-Vogt 30", "1400");
        let home = listing(Source::Homegate, "boulevard carl-vogt 30", "1350");

        let first = merge(vec![scout.clone()], vec![home.clone()], &resolver());
        let second = merge(vec![home], vec![scout.clone()], &resolver());

        assert_eq!(first.listings, vec![scout.clone()]);
        assert_eq!(second.listings, vec![scout]);
    }

    #[test]
    fn later_listing_wins_among_equal_priority() {
        let existing = vec![listing(Source::Homegate, "Rue Voltaire 8", "1300")];
        let incoming = vec![listing(
            Source::Other("Anibis".into()),
            "Rue Voltaire 8",
            "1280",
        )];

        let out = merge(existing, incoming, &resolver());

        assert_eq!(out.listings.len(), 1);
        assert_eq!(out.listings[0].rent, "1280");
    }

    #[test]
    fn later_preferred_listing_replaces_earlier_preferred() {
        let existing = vec![listing(Source::ImmoScout24, "Rue de Berne 3", "1500")];
        let incoming = vec![listing(Source::ImmoScout24, "Rue de Berne 3", "1450")];

        let out = merge(existing, incoming, &resolver());

        assert_eq!(out.listings.len(), 1);
        assert_eq!(out.listings[0].rent, "1450");
    }

    #[test]
    fn empty_existing_dedups_incoming() {
        let incoming = vec![
            listing(Source::Homegate, "Rue A 1", "1200"),
            listing(Source::Homegate, "RUE A 1", "1210"),
            listing(Source::Homegate, "Rue B 2", "1300"),
        ];

        let out = merge(Vec::new(), incoming, &resolver());

        assert_eq!(out.listings.len(), 2);
        assert_eq!(out.existing, 0);
        assert_eq!(out.incoming, 3);
        assert_eq!(out.duplicates_dropped, 1);
    }

    #[test]
    fn empty_incoming_dedups_existing() {
        let corpus = vec![
            listing(Source::Homegate, "Rue A 1", "1200"),
            listing(Source::ImmoScout24, "rue a 1", "1190"),
            listing(Source::Homegate, "Rue B 2", "1300"),
        ];

        let out = merge(corpus.clone(), Vec::new(), &resolver());
        let alone = merge(Vec::new(), corpus, &resolver());

        assert_eq!(out.listings, alone.listings);
        assert_eq!(out.listings.len(), 2);
        assert!(out
            .listings
            .iter()
            .any(|l| l.source == Source::ImmoScout24 && l.rent == "1190"));
    }

    #[test]
    fn output_keys_are_unique_and_deterministic() {
        let batch: Vec<Listing> = (0..40)
            .map(|i| {
                let source = if i % 3 == 0 {
                    Source::ImmoScout24
                } else {
                    Source::Homegate
                };
                listing(source, &format!("Chemin {} ", i % 7), &format!("{}", 1100 + i))
            })
            .collect();

        let a = merge(batch[..20].to_vec(), batch[20..].to_vec(), &resolver());
        let b = merge(batch[..20].to_vec(), batch[20..].to_vec(), &resolver());

        let keys: HashSet<String> = a.listings.iter().map(|l| resolver().key_of(l)).collect();
        assert_eq!(keys.len(), a.listings.len());
        assert_eq!(a.listings.len(), 7);
        assert_eq!(a.listings, b.listings);
    }
}
