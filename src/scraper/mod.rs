mod portals;
mod scraper;
mod scraper_error;

pub use portals::Portal;
// `self::` keeps this apart from the `scraper` crate.
pub use self::scraper::{PortalScraper, ScrapeSettings};
pub use scraper_error::ScraperError;
