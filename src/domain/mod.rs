pub mod criteria;
pub mod listing;
pub mod logic;

pub use criteria::FilterCriteria;
pub use listing::{Listing, Source};
