use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected response shape: {message}")]
    Shape { message: String },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

impl ExplorerError {
    /// Whether the failure came from talking to a remote endpoint
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Parse(_) | Self::Shape { .. }
        )
    }
}
