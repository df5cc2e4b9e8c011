use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Failures of the file-backed stores. Always reported to HTTP callers as an opaque 500.
#[derive(Debug, ThisError)]
pub enum StorageError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but does not parse. Never overwritten automatically.
    #[error("Corrupt store file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode store payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
