pub mod dispatch_service;
pub mod feed_service;
pub mod fetch_service;
pub mod filter_service;
pub mod merge_service;
pub mod render_service;
pub mod run_service;

pub use dispatch_service::dispatch;
pub use feed_service::FeedService;
pub use fetch_service::{FetchService, Stage};
pub use filter_service::{RecencyFilter, ScanMode};
pub use merge_service::{merge_artifacts, Report, REPORT_HEADER};
pub use render_service::render_feed;
pub use run_service::{RunOptions, RunService, RunSummary};
