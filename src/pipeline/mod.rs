pub mod cycle;
pub mod filter;
pub mod identity;
pub mod merge;
pub mod rank;
pub mod stats;

pub use cycle::{run_cycle, CycleReport};
pub use identity::IdentityResolver;
pub use stats::RentStats;
