// scraper.rs
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;

use crate::domain::{FilterCriteria, Listing};
use crate::scraper::{Portal, ScraperError};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0",
];

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub max_per_portal: usize,
    pub max_attempts: u64,
    /// Random pause before each page, in seconds (inclusive).
    pub page_delay_secs: (u64, u64),
    pub timeout: Duration,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            max_per_portal: 10,
            max_attempts: 3,
            page_delay_secs: (3, 6),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Fetches portal search pages and hands back raw, unfiltered listings.
pub struct PortalScraper {
    client: Client,
    settings: ScrapeSettings,
}

impl PortalScraper {
    pub fn new(settings: ScrapeSettings) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// One raw batch from every portal. A portal that fails contributes
    /// nothing; it never aborts the others.
    pub fn scrape_all(&self, portals: &[Portal], criteria: &FilterCriteria) -> Vec<Listing> {
        let mut batch = Vec::new();

        for portal in portals {
            info!(portal = %portal.source(), "scraping portal");
            match self.scrape_portal(*portal, criteria) {
                Ok(listings) => {
                    if listings.is_empty() {
                        warn!(portal = %portal.source(), "no listings found");
                    } else {
                        info!(portal = %portal.source(), count = listings.len(), "portal scraped");
                    }
                    batch.extend(listings);
                }
                Err(e) => warn!(portal = %portal.source(), error = %e, "portal skipped"),
            }
        }

        batch
    }

    pub fn scrape_portal(&self, portal: Portal, criteria: &FilterCriteria) -> Result<Vec<Listing>, ScraperError> {
        let url = portal.search_url(criteria)?;
        self.polite_pause();
        let html = self.fetch_html(&url)?;
        portal.parse_listings(&html, &url, self.settings.max_per_portal)
    }

    fn polite_pause(&self) {
        let (lo, hi) = self.settings.page_delay_secs;
        if hi == 0 {
            return;
        }
        let millis = rand::thread_rng().gen_range(lo * 1000..=hi.max(lo) * 1000);
        std::thread::sleep(Duration::from_millis(millis));
    }

    pub fn fetch_html(&self, url: &Url) -> Result<String, ScraperError> {
        const MAX_BACKOFF_SECS: u64 = 10;
        const JITTER_MAX_SECS: u64 = 2;

        let mut last_err = None;

        for attempt in 1..=self.settings.max_attempts {
            let start = Instant::now();

            match self.try_fetch_html(url) {
                Ok(html) => {
                    info!(%url, attempt, elapsed = ?start.elapsed(), "page fetched");
                    return Ok(html);
                }
                Err(e) if e.is_transient() => {
                    warn!(%url, attempt, elapsed = ?start.elapsed(), error = %e, "fetch failed");
                    last_err = Some(e);

                    if attempt < self.settings.max_attempts {
                        // backoff
                        let base = std::cmp::min(2 * attempt, MAX_BACKOFF_SECS);
                        let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_SECS);
                        std::thread::sleep(Duration::from_secs(base + jitter));
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| ScraperError::Network("retry loop exhausted".into())))
    }

    fn try_fetch_html(&self, url: &Url) -> Result<String, ScraperError> {
        let resp = self
            .client
            .get(url.as_str())
            .headers(browser_headers())
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::FORBIDDEN {
            return Err(ScraperError::Blocked(url.to_string()));
        }
        if !status.is_success() {
            return Err(ScraperError::HttpStatus(status.as_u16(), url.to_string()));
        }

        resp.text().map_err(|e| ScraperError::Network(e.to_string()))
    }
}

/// Rotating browser-like headers, French-Swiss first.
fn browser_headers() -> HeaderMap {
    let agent = USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0]);

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(agent));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("fr-CH,fr;q=0.9,en;q=0.8"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_look_like_a_browser() {
        let headers = browser_headers();
        let agent = headers[USER_AGENT].to_str().unwrap();

        assert!(USER_AGENTS.contains(&agent));
        assert_eq!(headers[ACCEPT_LANGUAGE], "fr-CH,fr;q=0.9,en;q=0.8");
    }

    #[test]
    fn only_throttling_and_server_errors_are_retried() {
        assert!(ScraperError::HttpStatus(429, "u".into()).is_transient());
        assert!(ScraperError::HttpStatus(503, "u".into()).is_transient());
        assert!(ScraperError::Network("reset".into()).is_transient());
        assert!(!ScraperError::HttpStatus(404, "u".into()).is_transient());
        assert!(!ScraperError::Blocked("u".into()).is_transient());
    }
}
