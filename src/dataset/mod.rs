pub mod loader;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::{Dataset, DatasetFormat, DatasetSource, load, parse};

/// Name of the word list shipped inside the binary.
pub const DEFAULT_BUNDLE: &str = "eiken-grade1-sample";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no bundled word list named '{0}'")]
    UnknownBundle(String),
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("cannot fetch {0}: built without network support")]
    NetworkDisabled(String),
}
