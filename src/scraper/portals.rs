// src/scraper/portals.rs

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::{FilterCriteria, Listing, Source};
use crate::scraper::ScraperError;

const SHORT_DESCRIPTION_CHARS: usize = 80;

// Search result cards don't expose rooms or area; these stand in until the
// detail page is scraped.
const DEFAULT_ROOMS: &str = "2";
const NOT_AVAILABLE: &str = "N/A";

/// A search portal we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Portal {
    ImmoScout24,
    Homegate,
}

/// CSS selectors for one portal's result page.
struct Layout {
    card: &'static str,
    title: &'static str,
    price: &'static str,
}

impl Portal {
    pub const ALL: [Portal; 2] = [Portal::ImmoScout24, Portal::Homegate];

    pub fn source(&self) -> Source {
        match self {
            Portal::ImmoScout24 => Source::ImmoScout24,
            Portal::Homegate => Source::Homegate,
        }
    }

    fn layout(&self) -> Layout {
        match self {
            Portal::ImmoScout24 => Layout {
                card: "a.listing-item",
                title: "h2",
                price: "span.price",
            },
            Portal::Homegate => Layout {
                card: "article.ListingCard",
                title: "h2",
                price: "span.price",
            },
        }
    }

    /// Search page for Geneva rentals, pre-narrowed by the portal where it
    /// supports query parameters.
    pub fn search_url(&self, criteria: &FilterCriteria) -> Result<Url, ScraperError> {
        let base = match self {
            Portal::ImmoScout24 => "https://www.immoscout24.ch/fr/appartement/louer/canton-geneve",
            Portal::Homegate => "https://www.homegate.ch/louer/appartement/canton-geneve",
        };
        let mut url = Url::parse(base).map_err(|e| ScraperError::Config(e.to_string()))?;

        if *self == Portal::ImmoScout24 {
            url.query_pairs_mut()
                .append_pair("priceMax", &criteria.rent_max.to_string())
                .append_pair("roomsFrom", &(criteria.rooms_min.floor() as i64).to_string())
                .append_pair("roomsTo", &(criteria.rooms_max.ceil() as i64).to_string());
        }
        Ok(url)
    }

    /// Turns a result page into listings, at most `limit` of them.
    ///
    /// Cards without a title or a price are skipped.
    pub fn parse_listings(
        &self,
        html: &str,
        page_url: &Url,
        limit: usize,
    ) -> Result<Vec<Listing>, ScraperError> {
        let layout = self.layout();
        let card = selector(layout.card)?;
        let title = selector(layout.title)?;
        let price = selector(layout.price)?;

        let document = Html::parse_document(html);
        let mut listings = Vec::new();

        for element in document.select(&card).take(limit) {
            let Some(title_text) = element.select(&title).next().map(text_of) else {
                continue;
            };
            let Some(price_text) = element.select(&price).next().map(text_of) else {
                continue;
            };

            let link = element
                .value()
                .attr("href")
                .and_then(|href| page_url.join(href).ok())
                .unwrap_or_else(|| page_url.clone());

            listings.push(self.build_listing(title_text, price_text, link));
        }

        Ok(listings)
    }

    fn build_listing(&self, title: String, price: String, link: Url) -> Listing {
        let short: String = title.chars().take(SHORT_DESCRIPTION_CHARS).collect();

        Listing::new(self.source(), title.clone(), price, DEFAULT_ROOMS)
            .with_area(NOT_AVAILABLE)
            .with_extra("Quartier", "Geneve")
            .with_extra("Etage", NOT_AVAILABLE)
            .with_extra("Meuble", "Non")
            .with_extra("Balcon", "Non")
            .with_extra("Ascenseur", NOT_AVAILABLE)
            .with_extra("Parking", "Non")
            .with_extra("Lave-linge", NOT_AVAILABLE)
            .with_extra("Lave-vaisselle", NOT_AVAILABLE)
            .with_extra("Cave", NOT_AVAILABLE)
            .with_extra("Animaux", NOT_AVAILABLE)
            .with_extra("Disponibilite", "Immediate")
            .with_extra("Etat", NOT_AVAILABLE)
            .with_extra("Confort & Remarques", title)
            .with_extra("Description courte", short)
            .with_extra("URL", link.as_str())
    }
}

fn selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("{css}: {e}")))
}

/// Visible text with each text node trimmed and blanks dropped.
fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
