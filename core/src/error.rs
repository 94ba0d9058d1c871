use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("articles directory not found at {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("failed to index {file}: {source}")]
    FileIndex {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
