use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to load document for {source_id}: {reason}")]
    Provider { source_id: String, reason: String },

    #[error("failed to write catalog to {path:?}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid designation pattern {pattern:?}")]
    Rules {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
