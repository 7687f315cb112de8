use crate::errors::PodcastResult;

#[cfg_attr(test, mockall::automock)]
pub trait FeedListRepository: Send + Sync {
    /// All valid feed URLs, in list order.
    fn get_all(&self) -> PodcastResult<Vec<String>>;
    fn add(&self, url: &str) -> PodcastResult<()>;
    fn exists(&self, url: &str) -> PodcastResult<bool>;
}
