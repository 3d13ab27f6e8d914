// src/pipeline/filter.rs

use std::fmt;

use tracing::{debug, info};

use crate::domain::logic::{parse_rent, parse_rooms};
use crate::domain::{FilterCriteria, Listing};

/// Why a listing was turned away.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    MalformedRent(String),
    MalformedRooms(String),
    RentOutOfRange(u64),
    RoomsOutOfRange(f64),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MalformedRent(raw) => write!(f, "unreadable rent {raw:?}"),
            Rejection::MalformedRooms(raw) => write!(f, "unreadable rooms {raw:?}"),
            Rejection::RentOutOfRange(rent) => write!(f, "rent {rent} CHF out of range"),
            Rejection::RoomsOutOfRange(rooms) => write!(f, "{rooms} rooms out of range"),
        }
    }
}

/// Checks one listing against the criteria. Bounds are inclusive.
pub fn evaluate(listing: &Listing, criteria: &FilterCriteria) -> Result<(), Rejection> {
    let rent = parse_rent(&listing.rent)
        .ok_or_else(|| Rejection::MalformedRent(listing.rent.clone()))?;
    let rooms = parse_rooms(&listing.rooms)
        .ok_or_else(|| Rejection::MalformedRooms(listing.rooms.clone()))?;

    if rent < criteria.rent_min || rent > criteria.rent_max {
        return Err(Rejection::RentOutOfRange(rent));
    }
    if rooms < criteria.rooms_min || rooms > criteria.rooms_max {
        return Err(Rejection::RoomsOutOfRange(rooms));
    }
    Ok(())
}

pub fn accept(listing: &Listing, criteria: &FilterCriteria) -> bool {
    evaluate(listing, criteria).is_ok()
}

/// Keeps the accepted listings of a raw batch, in their original order.
pub fn filter_batch(batch: Vec<Listing>, criteria: &FilterCriteria) -> Vec<Listing> {
    let raw = batch.len();
    let accepted: Vec<Listing> = batch
        .into_iter()
        .filter(|listing| match evaluate(listing, criteria) {
            Ok(()) => true,
            Err(reason) => {
                debug!(
                    address = %listing.address,
                    source = %listing.source,
                    %reason,
                    "listing rejected"
                );
                false
            }
        })
        .collect();

    info!(raw, accepted = accepted.len(), "filtered batch");
    accepted
}
