//! Publication side: tabular exports and the git push that redeploys the site.

pub mod csv;
pub mod git;
pub mod xlsx;

use std::path::PathBuf;

use tracing::info;

use crate::domain::Listing;
use crate::errors::PublishError;

pub use git::{GitPublisher, PublishOutcome};

/// Header and rows of the corpus as a table.
///
/// The header is the field order of the first listing. Cells a later listing
/// doesn't have are left empty; fields missing from the header are not
/// exported.
pub fn table(listings: &[Listing]) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let header: Vec<String> = listings.first()?.to_fields().into_keys().collect();
    let rows = listings
        .iter()
        .map(|listing| {
            let fields = listing.to_fields();
            header
                .iter()
                .map(|key| fields.get(key).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Some((header, rows))
}

/// Where the exports go. `xlsx` is opt-in.
#[derive(Debug, Clone)]
pub struct ExportTargets {
    pub csv: PathBuf,
    pub xlsx: Option<PathBuf>,
}

/// Writes every configured export; returns the files actually written.
pub fn export_all(listings: &[Listing], targets: &ExportTargets) -> Result<Vec<PathBuf>, PublishError> {
    let mut written = Vec::new();
    if let Some(path) = csv::export_csv(listings, &targets.csv)? {
        written.push(path);
    }
    if let Some(xlsx_path) = &targets.xlsx {
        if let Some(path) = xlsx::export_xlsx(listings, xlsx_path)? {
            written.push(path);
        }
    }
    info!(files = written.len(), "exports written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;

    #[test]
    fn header_follows_first_listing() {
        let listings = vec![
            Listing::new(Source::ImmoScout24, "Rue A 1", "1200", "2")
                .with_area("40")
                .with_extra("Etage", "2"),
            Listing::new(Source::Homegate, "Rue B 2", "1300", "3").with_extra("Balcon", "Oui"),
        ];

        let (header, rows) = table(&listings).unwrap();

        assert_eq!(
            header,
            vec!["Portail", "Adresse", "Pieces", "Surface m²", "Loyer CHF", "Etage"]
        );
        assert_eq!(rows[1], vec!["Homegate.ch", "Rue B 2", "3", "", "1300", ""]);
    }

    #[test]
    fn empty_corpus_has_no_table() {
        assert!(table(&[]).is_none());
    }
}
