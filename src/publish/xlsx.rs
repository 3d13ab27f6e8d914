// src/publish/xlsx.rs
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};
use tracing::{info, warn};

use crate::domain::Listing;
use crate::errors::PublishError;
use crate::publish::table;

const SHEET_NAME: &str = "Annonces";

/// Same table as the CSV export, in a single worksheet.
pub fn export_xlsx(listings: &[Listing], path: &Path) -> Result<Option<PathBuf>, PublishError> {
    let Some((header, rows)) = table(listings) else {
        warn!(path = %path.display(), "empty corpus, XLSX export skipped");
        return Ok(None);
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();

    // Headers
    for (col, name) in header.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &bold)?;
    }

    // Rows
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            worksheet.write_string(r, col as u16, cell)?;
        }
    }

    workbook.save(path)?;

    info!(path = %path.display(), rows = rows.len(), "XLSX exported");
    Ok(Some(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;
    use tempfile::TempDir;

    #[test]
    fn writes_a_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");
        let listings = vec![Listing::new(Source::Homegate, "Rue de Carouge 50", "1400", "2")];

        let written = export_xlsx(&listings, &path).unwrap();

        assert_eq!(written, Some(path.clone()));
        // xlsx files are zip archives
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn empty_corpus_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.xlsx");

        assert_eq!(export_xlsx(&[], &path).unwrap(), None);
        assert!(!path.exists());
    }
}
