// src/pipeline/identity.rs

use crate::domain::{Listing, Source};

/// Collision rank of a listing's source. Higher wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Standard,
    Preferred,
}

/// Decides when two listings are the same flat, and which one to keep.
///
/// Identity is the address only, lowercased and trimmed. Addresses that differ
/// in any other way ("Rue de Lyon 5" vs "Rue de Lyon, 5") stay distinct.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    preferred: Source,
}

impl Default for IdentityResolver {
    fn default() -> Self {
        Self::new(Source::ImmoScout24)
    }
}

impl IdentityResolver {
    pub fn new(preferred: Source) -> Self {
        Self { preferred }
    }

    pub fn key_of(&self, listing: &Listing) -> String {
        listing.address.trim().to_lowercase()
    }

    pub fn priority_of(&self, listing: &Listing) -> Priority {
        if listing.source == self.preferred {
            Priority::Preferred
        } else {
            Priority::Standard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_case_and_outer_whitespace() {
        let resolver = IdentityResolver::default();
        let a = Listing::new(Source::Homegate, "Rue de Lyon 5", "1200", "2");
        let b = Listing::new(Source::ImmoScout24, "  rue de LYON 5 ", "1250", "2");

        assert_eq!(resolver.key_of(&a), resolver.key_of(&b));
    }

    #[test]
    fn key_keeps_inner_formatting() {
        let resolver = IdentityResolver::default();
        let a = Listing::new(Source::Homegate, "Rue de Lyon 5", "1200", "2");
        let b = Listing::new(Source::Homegate, "Rue de Lyon, 5", "1200", "2");

        assert_ne!(resolver.key_of(&a), resolver.key_of(&b));
    }

    #[test]
    fn only_the_preferred_source_ranks_higher() {
        let resolver = IdentityResolver::default();
        let scout = Listing::new(Source::ImmoScout24, "x", "1", "1");
        let home = Listing::new(Source::Homegate, "x", "1", "1");
        let other = Listing::new(Source::Other("Anibis".into()), "x", "1", "1");

        assert_eq!(resolver.priority_of(&scout), Priority::Preferred);
        assert_eq!(resolver.priority_of(&home), Priority::Standard);
        assert_eq!(resolver.priority_of(&other), Priority::Standard);
        assert!(Priority::Preferred > Priority::Standard);
    }

    #[test]
    fn preferred_source_is_configurable() {
        let resolver = IdentityResolver::new(Source::Homegate);
        let home = Listing::new(Source::Homegate, "x", "1", "1");
        assert_eq!(resolver.priority_of(&home), Priority::Preferred);
    }
}
