pub mod traits;
pub mod http;
pub mod rss;

pub use traits::FeedFetcher;
pub use http::HttpFetcher;
pub use rss::parse_channel;
