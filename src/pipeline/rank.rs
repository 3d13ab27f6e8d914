// src/pipeline/rank.rs

use crate::domain::logic::{parse_area, parse_rent};
use crate::domain::Listing;

/// Sort value for an unreadable or missing number: last place.
pub const UNKNOWN_LAST: u64 = u64::MAX;

pub fn rent_sort_key(listing: &Listing) -> u64 {
    parse_rent(&listing.rent).unwrap_or(UNKNOWN_LAST)
}

pub fn area_sort_key(listing: &Listing) -> u64 {
    listing
        .area
        .as_deref()
        .and_then(parse_area)
        .unwrap_or(UNKNOWN_LAST)
}

/// Cheapest first, then smallest. Stable, so equal listings keep their order
/// and an unchanged corpus ranks to the same sequence every run.
pub fn rank(mut listings: Vec<Listing>) -> Vec<Listing> {
    listings.sort_by_key(|listing| (rent_sort_key(listing), area_sort_key(listing)));
    listings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;

    fn listing(address: &str, rent: &str, area: Option<&str>) -> Listing {
        let l = Listing::new(Source::Homegate, address, rent, "2");
        match area {
            Some(a) => l.with_area(a),
            None => l,
        }
    }

    fn addresses(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.address.as_str()).collect()
    }

    #[test]
    fn orders_by_rent_then_area() {
        let ranked = rank(vec![
            listing("A", "1300", Some("50")),
            listing("B", "1150", Some("40")),
            listing("C", "1150", Some("30")),
        ]);

        assert_eq!(addresses(&ranked), vec!["C", "B", "A"]);
    }

    #[test]
    fn unreadable_values_sort_last_without_dropping() {
        let ranked = rank(vec![
            listing("no-rent", "N/A", Some("20")),
            listing("no-area", "1200", Some("N/A")),
            listing("missing-area", "1200", None),
            listing("full", "1200", Some("70")),
            listing("cheap", "1100", None),
        ]);

        assert_eq!(
            addresses(&ranked),
            vec!["cheap", "full", "no-area", "missing-area", "no-rent"]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = rank(vec![
            listing("first", "1400", Some("55")),
            listing("second", "1'400.-", Some("55 m²")),
            listing("third", "1400", Some("55")),
        ]);

        assert_eq!(addresses(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn ranking_twice_is_a_no_op() {
        let once = rank(vec![
            listing("A", "1500", None),
            listing("B", "1200", Some("44")),
            listing("C", "1200", Some("44")),
            listing("D", "abc", None),
        ]);
        let twice = rank(once.clone());

        assert_eq!(once, twice);
    }
}
