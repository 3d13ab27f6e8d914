// src/store/json.rs

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::Listing;
use crate::errors::StoreError;
use crate::store::CorpusStore;

/// Corpus kept as a pretty-printed JSON array (2-space indent, raw UTF-8).
#[derive(Debug, Clone)]
pub struct JsonCorpusStore {
    path: PathBuf,
}

impl JsonCorpusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("corpus"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CorpusStore for JsonCorpusStore {
    fn load(&self) -> Result<Vec<Listing>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no corpus yet, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let listings: Vec<Listing> =
            serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        info!(path = %self.path.display(), count = listings.len(), "corpus loaded");
        Ok(listings)
    }

    fn save(&self, listings: &[Listing]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(listings)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        // Write beside the target, then swap, so a failed write leaves the
        // previous corpus untouched.
        let tmp = self.temp_path();
        let written = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, &self.path));
        if let Err(source) = written {
            if let Err(e) = fs::remove_file(&tmp) {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %e, "could not remove temp file");
                }
            }
            return Err(StoreError::Write {
                path: self.path.clone(),
                source,
            });
        }

        info!(path = %self.path.display(), count = listings.len(), "corpus saved");
        Ok(())
    }
}
