use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PodcastError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Feed list errors
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    #[error("Feed already exists: {0}")]
    FeedAlreadyExists(String),

    #[error("Feed list error: {0}")]
    FeedList(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("HTTP request failed with status {0}")]
    HttpStatus(u16),

    #[error("Timed out fetching {0}")]
    Timeout(String),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    Parse(String),

    #[error("Unrecognized date format: {0:?}")]
    DateParse(String),

    // Scratch directory errors
    #[error("couldn't write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scratch directory error at {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Worker errors
    #[error("Worker panicked: {0}")]
    WorkerPanic(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PodcastError {
    /// Scratch directory failures invalidate the merge step and abort the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PodcastError::Directory { .. })
    }
}

pub type PodcastResult<T> = Result<T, PodcastError>;
