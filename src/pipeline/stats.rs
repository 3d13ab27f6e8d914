// src/pipeline/stats.rs

use std::fmt;

use crate::domain::logic::parse_rent;
use crate::domain::Listing;

/// Rent summary over the listings whose rent can be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentStats {
    pub count: usize,
    pub min: u64,
    pub max: u64,
    /// Integer mean, rounded down.
    pub mean: u64,
}

impl RentStats {
    pub fn from_listings(listings: &[Listing]) -> Option<Self> {
        let rents: Vec<u64> = listings.iter().filter_map(|l| parse_rent(&l.rent)).collect();
        let min = *rents.iter().min()?;
        let max = *rents.iter().max()?;
        let sum: u128 = rents.iter().map(|&r| u128::from(r)).sum();
        let mean = (sum / rents.len() as u128) as u64;

        Some(Self {
            count: rents.len(),
            min,
            max,
            mean,
        })
    }
}

impl fmt::Display for RentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} loyers : min CHF {}, max CHF {}, moyenne CHF {}",
            self.count, self.min, self.max, self.mean
        )
    }
}
