// src/publish/csv.rs
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::Listing;
use crate::errors::PublishError;
use crate::publish::table;

const SEPARATOR: &str = ",";

/// Spreadsheet tools only read accents correctly with a BOM.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A cell as written to the file: quoted, with doubled quotes, only when it
/// holds a separator, a quote or a line break.
fn escape(cell: &str) -> Cow<'_, str> {
    if cell.contains(SEPARATOR) || cell.contains(['"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}

fn write_record<W: Write>(w: &mut W, cells: &[String]) -> io::Result<()> {
    let line = cells
        .iter()
        .map(|cell| escape(cell))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    w.write_all(line.as_bytes())?;
    w.write_all(b"\r\n")
}

/// BOM, header line, then one CRLF line per listing. Writes nothing at all
/// for an empty corpus.
pub fn write_listings<W: Write>(mut w: W, listings: &[Listing]) -> io::Result<()> {
    let Some((header, rows)) = table(listings) else {
        return Ok(());
    };
    w.write_all(UTF8_BOM)?;
    write_record(&mut w, &header)?;
    for row in &rows {
        write_record(&mut w, row)?;
    }
    Ok(())
}

/// Exports the corpus to `path` as BOM-prefixed UTF-8 CSV.
///
/// Nothing is written for an empty corpus; returns the path when a file was
/// produced.
pub fn export_csv(listings: &[Listing], path: &Path) -> Result<Option<PathBuf>, PublishError> {
    if listings.is_empty() {
        warn!(path = %path.display(), "empty corpus, CSV export skipped");
        return Ok(None);
    }

    let to_err = |source| PublishError::Export {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(to_err)?;
        }
    }

    let file = File::create(path).map_err(to_err)?;
    let mut out = BufWriter::new(file);
    write_listings(&mut out, listings).map_err(to_err)?;
    out.flush().map_err(to_err)?;

    info!(path = %path.display(), rows = listings.len(), "CSV exported");
    Ok(Some(path.to_path_buf()))
}
