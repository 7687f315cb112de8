use std::time::Duration;

use crate::errors::PodcastError;
use crate::text::truncate_chars;

pub const TITLE_WIDTH: usize = 25;
pub const URL_WIDTH: usize = 80;

/// Column header matching [`Outcome`]'s `Display` layout.
pub fn outcome_header() -> String {
    format!(
        "{:>10} : {:>8} : {:>20} : {:<width$} : {}",
        "secs",
        "nbytes",
        "sha256",
        "Title",
        "URL",
        width = TITLE_WIDTH
    )
}

/// What a successful worker reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub url: String,
    pub elapsed: Duration,
    pub bytes_written: usize,
    /// Hex of the first bytes of the artifact key.
    pub hash_prefix: String,
    pub channel_title: String,
}

/// Exactly one of these is produced per feed per run.
#[derive(Debug)]
pub enum Outcome {
    Fetched(FetchSummary),
    Failed { url: String, error: PodcastError },
}

impl Outcome {
    pub fn url(&self) -> &str {
        match self {
            Outcome::Fetched(summary) => &summary.url,
            Outcome::Failed { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Fetched(_))
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Fetched(summary) => write!(
                f,
                "{:9.2}s : {:<8} : {:>20} : {:<width$} : {}",
                summary.elapsed.as_secs_f64(),
                summary.bytes_written,
                summary.hash_prefix,
                truncate_chars(&summary.channel_title, TITLE_WIDTH),
                truncate_chars(&summary.url, URL_WIDTH),
                width = TITLE_WIDTH
            ),
            Outcome::Failed { url, error } => {
                write!(f, "{:>10} : {} : {}", "FAILED", truncate_chars(url, URL_WIDTH), error)
            }
        }
    }
}
