// errors.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Bad settings, detected before any work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Corpus persistence failures. These always fail the run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read corpus {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("corpus {} is not valid JSON: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write corpus {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize corpus: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Export and version-control failures.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to write export {}: {source}", path.display())]
    Export { path: PathBuf, source: io::Error },
    #[error("xlsx export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to start `git {args}`: {source}")]
    GitSpawn { args: String, source: io::Error },
    #[error("`git {args}` exited with code {code:?}: {stderr}")]
    GitFailed {
        args: String,
        code: Option<i32>,
        stderr: String,
    },
}
