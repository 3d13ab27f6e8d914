use dotenvy::dotenv;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::{FilterCriteria, Source};
use crate::errors::ConfigError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub criteria: FilterCriteria,
    pub preferred_source: Source,
    pub data_file: PathBuf,
    pub csv_file: PathBuf,
    pub xlsx_file: Option<PathBuf>,
    pub repo_dir: PathBuf,
    pub git_remote: String,
    pub git_branch: String,
    pub max_per_portal: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = FilterCriteria::default();
        let criteria = FilterCriteria {
            rent_min: parse_var(&get, "IMMO_RENT_MIN", defaults.rent_min)?,
            rent_max: parse_var(&get, "IMMO_RENT_MAX", defaults.rent_max)?,
            rooms_min: parse_var(&get, "IMMO_ROOMS_MIN", defaults.rooms_min)?,
            rooms_max: parse_var(&get, "IMMO_ROOMS_MAX", defaults.rooms_max)?,
        };
        criteria.validate()?;

        let repo_dir: PathBuf = get("IMMO_REPO_DIR").unwrap_or_else(|| ".".to_string()).into();
        let config = Self {
            criteria,
            preferred_source: get("IMMO_PREFERRED_SOURCE")
                .map(|label| Source::from_label(&label))
                .unwrap_or(Source::ImmoScout24),
            data_file: in_repo(&repo_dir, get("IMMO_DATA_FILE").as_deref().unwrap_or("data.json")),
            csv_file: in_repo(&repo_dir, get("IMMO_CSV_FILE").as_deref().unwrap_or("data.csv")),
            xlsx_file: get("IMMO_XLSX_FILE").map(|path| in_repo(&repo_dir, path)),
            repo_dir,
            git_remote: get("IMMO_GIT_REMOTE").unwrap_or_else(|| "origin".to_string()),
            git_branch: get("IMMO_GIT_BRANCH").unwrap_or_else(|| "main".to_string()),
            max_per_portal: parse_var(&get, "IMMO_MAX_PER_PORTAL", 10)?,
        };
        Ok(config)
    }

    /// Relative artifact paths live in the published repository, so the file
    /// written is the file git stages.
    pub fn in_repo(&self, path: impl AsRef<Path>) -> PathBuf {
        in_repo(&self.repo_dir, path)
    }
}

fn in_repo(repo_dir: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_dir.join(path)
    }
}

fn parse_var<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var, value }),
    }
}
