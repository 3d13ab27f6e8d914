use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ScraperError {
    Network(String),
    Blocked(String),
    HttpStatus(u16, String),
    HtmlParse(String),
    Config(String),
}

impl ScraperError {
    /// Worth another attempt after a pause.
    pub fn is_transient(&self) -> bool {
        match self {
            ScraperError::Network(_) => true,
            ScraperError::HttpStatus(code, _) => matches!(code, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

impl fmt::Display for ScraperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScraperError::Network(msg) => write!(f, "Network error: {msg}"),
            ScraperError::Blocked(msg) => write!(f, "Blocked by site: {msg}"),
            ScraperError::HttpStatus(code, url) => write!(f, "HTTP {code} from {url}"),
            ScraperError::HtmlParse(msg) => write!(f, "HTML parse error: {msg}"),
            ScraperError::Config(msg) => write!(f, "Scraper configuration error: {msg}"),
        }
    }
}

impl Error for ScraperError {}
