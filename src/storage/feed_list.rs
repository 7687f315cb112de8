use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{PodcastError, PodcastResult};
use crate::storage::traits::FeedListRepository;

static FEED_URL_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("static regex"));

/// Seeded into a new feed list so the first run has something to fetch.
pub const DEFAULT_FEEDS: &[&str] = &[
    "http://feeds.5by5.tv/master",
    "http://feed.thisamericanlife.org/talpodcast",
];

/// Plain-text feed list: one URL per line, anything else ignored.
pub struct FeedListFile {
    path: PathBuf,
}

impl FeedListFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the list with [`DEFAULT_FEEDS`] if it does not exist yet.
    pub fn ensure_exists(&self) -> PodcastResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = DEFAULT_FEEDS.join("\n");
        content.push('\n');
        fs::write(&self.path, content)?;
        tracing::info!(path = %self.path.display(), "created default feed list");

        Ok(())
    }

    /// Keep lines that look like HTTP(S) URLs, trimmed of spaces and tabs.
    pub fn parse_lines(content: &str) -> Vec<String> {
        content
            .lines()
            .map(|line| line.trim_matches(|c| c == ' ' || c == '\t' || c == '\r'))
            .filter(|line| FEED_URL_LINE.is_match(line))
            .map(String::from)
            .collect()
    }
}

impl FeedListRepository for FeedListFile {
    fn get_all(&self) -> PodcastResult<Vec<String>> {
        self.ensure_exists()?;
        let content = fs::read_to_string(&self.path).map_err(|e| {
            PodcastError::FeedList(format!("couldn't read {}: {}", self.path.display(), e))
        })?;
        Ok(Self::parse_lines(&content))
    }

    fn add(&self, url: &str) -> PodcastResult<()> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, format!("{}\n", url))?;
            return Ok(());
        }

        let existing = fs::read_to_string(&self.path)?;
        let mut file = fs::OpenOptions::new().append(true).open(&self.path)?;
        if !existing.is_empty() && !existing.ends_with('\n') {
            writeln!(file)?;
        }
        writeln!(file, "{}", url)?;

        Ok(())
    }

    fn exists(&self, url: &str) -> PodcastResult<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Self::parse_lines(&content).iter().any(|u| u == url))
    }
}
