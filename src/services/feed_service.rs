use url::Url;

use crate::errors::{PodcastError, PodcastResult};
use crate::sources::FeedFetcher;
use crate::storage::traits::FeedListRepository;

pub struct FeedService<'a, R: FeedListRepository> {
    repository: R,
    fetcher: &'a dyn FeedFetcher,
}

impl<'a, R: FeedListRepository> FeedService<'a, R> {
    pub fn new(repository: R, fetcher: &'a dyn FeedFetcher) -> Self {
        Self {
            repository,
            fetcher,
        }
    }

    /// Add a new feed by URL
    /// Checks that it is a well-formed http(s) URL that answers, then appends
    /// it to the feed list
    pub fn add(&self, url: &str) -> PodcastResult<String> {
        let url = validate(url)?;

        if self.repository.exists(&url)? {
            return Err(PodcastError::FeedAlreadyExists(url));
        }

        self.fetcher.probe(&url)?;
        self.repository.add(&url)?;
        tracing::info!(url = %url, "feed added");

        Ok(url)
    }
}

fn validate(url: &str) -> PodcastResult<String> {
    let url = url.trim();
    let parsed = Url::parse(url).map_err(|e| PodcastError::InvalidUrl(format!("{}: {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PodcastError::InvalidUrl(format!(
            "{}: only http and https feeds are supported",
            url
        )));
    }
    if parsed.host_str().is_none() {
        return Err(PodcastError::InvalidUrl(format!("{}: missing host", url)));
    }

    Ok(url.to_string())
}
