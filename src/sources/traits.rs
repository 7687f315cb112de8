use crate::errors::PodcastResult;

#[cfg_attr(test, mockall::automock)]
pub trait FeedFetcher: Send + Sync {
    /// GET the feed and return its body. Non-success statuses are errors.
    fn fetch(&self, url: &str) -> PodcastResult<Vec<u8>>;

    /// Check that a URL is reachable without downloading its body
    fn probe(&self, url: &str) -> PodcastResult<()>;
}
