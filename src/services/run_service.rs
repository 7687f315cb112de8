use std::time::{Duration, Instant};

use chrono::Utc;

use crate::domain::Outcome;
use crate::errors::PodcastResult;
use crate::services::dispatch_service::dispatch;
use crate::services::fetch_service::FetchService;
use crate::services::filter_service::{RecencyFilter, ScanMode};
use crate::services::merge_service::{merge_artifacts, Report};
use crate::sources::FeedFetcher;
use crate::storage::traits::FeedListRepository;
use crate::storage::ScratchDir;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub days: u32,
    pub mode: ScanMode,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub outcomes: Vec<Outcome>,
    pub report: Report,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}

/// One full pass: read the feed list, fetch every feed concurrently, merge
/// the artifacts into a report and clean up after itself.
pub struct RunService<'a, R: FeedListRepository> {
    feeds: R,
    fetcher: &'a dyn FeedFetcher,
    scratch: ScratchDir,
}

impl<'a, R: FeedListRepository> RunService<'a, R> {
    pub fn new(feeds: R, fetcher: &'a dyn FeedFetcher, scratch: ScratchDir) -> Self {
        Self {
            feeds,
            fetcher,
            scratch,
        }
    }

    pub fn run<F>(&self, options: RunOptions, on_outcome: F) -> PodcastResult<RunSummary>
    where
        F: FnMut(&Outcome),
    {
        let start = Instant::now();
        let urls = self.feeds.get_all()?;
        tracing::info!(feeds = urls.len(), days = options.days, "starting run");

        self.scratch.ensure_exists()?;
        self.scratch.clear()?;

        // One clock reading for the whole run, so every feed is judged alike.
        let now = Utc::now();
        let worker = FetchService::new(
            self.fetcher,
            &self.scratch,
            RecencyFilter::new(options.days, options.mode),
            now,
        );
        let outcomes = dispatch(&worker, &urls, on_outcome);

        let merged = merge_artifacts(&self.scratch);
        let cleared = self.scratch.clear();
        let report = merged?;
        cleared?;

        Ok(RunSummary {
            outcomes,
            report,
            elapsed: start.elapsed(),
        })
    }
}
