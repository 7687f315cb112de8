use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::domain::{FetchSummary, Outcome};
use crate::errors::PodcastResult;
use crate::services::filter_service::RecencyFilter;
use crate::services::render_service::render_feed;
use crate::sources::{parse_channel, FeedFetcher};
use crate::storage::{ArtifactKey, ScratchDir};

/// Stages a feed goes through. A failure at any stage ends the feed's work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Parsing,
    Filtering,
    Rendering,
    Writing,
}

/// Runs one feed end to end. A worker shares nothing mutable with other
/// workers: it reads its own feed and writes its own artifact.
pub struct FetchService<'a> {
    fetcher: &'a dyn FeedFetcher,
    scratch: &'a ScratchDir,
    filter: RecencyFilter,
    now: DateTime<Utc>,
}

impl<'a> FetchService<'a> {
    pub fn new(
        fetcher: &'a dyn FeedFetcher,
        scratch: &'a ScratchDir,
        filter: RecencyFilter,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            fetcher,
            scratch,
            filter,
            now,
        }
    }

    /// Process one feed. Never fails: errors become a failed [`Outcome`].
    pub fn run(&self, url: &str) -> Outcome {
        let start = Instant::now();

        match self.process(url, start) {
            Ok(summary) => Outcome::Fetched(summary),
            Err(error) => {
                tracing::debug!(url, %error, "feed failed");
                Outcome::Failed {
                    url: url.to_string(),
                    error,
                }
            }
        }
    }

    fn process(&self, url: &str, start: Instant) -> PodcastResult<FetchSummary> {
        enter(url, Stage::Fetching);
        let body = self.fetcher.fetch(url)?;

        enter(url, Stage::Parsing);
        let channel = parse_channel(&body)?;

        enter(url, Stage::Filtering);
        let items = self.filter.in_scope(&channel, self.now);

        enter(url, Stage::Rendering);
        let text = render_feed(&channel, &items);

        enter(url, Stage::Writing);
        let key = ArtifactKey::for_url(url);
        let bytes_written = self.scratch.write(&key, &text)?;

        Ok(FetchSummary {
            url: url.to_string(),
            elapsed: start.elapsed(),
            bytes_written,
            hash_prefix: key.prefix_hex(),
            channel_title: channel.title,
        })
    }
}

fn enter(url: &str, stage: Stage) {
    tracing::debug!(url, ?stage, "worker stage");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PodcastError;
    use crate::services::filter_service::ScanMode;
    use crate::sources::traits::MockFeedFetcher;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn feed_xml(pub_date: DateTime<Utc>) -> Vec<u8> {
        format!(
            r#"<rss version="2.0"><channel>
  <title>Daily Show</title>
  <link>https://a.example/</link>
  <item>
    <title>Today</title>
    <guid>today</guid>
    <pubDate>{}</pubDate>
    <enclosure url="https://a.example/today.mp3" length="10" type="audio/mpeg"/>
  </item>
</channel></rss>"#,
            pub_date.to_rfc2822()
        )
        .into_bytes()
    }

    #[test]
    fn test_successful_feed_writes_artifact() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::new(dir.path());
        let mut fetcher = MockFeedFetcher::new();
        let body = feed_xml(now() - Duration::hours(12));
        fetcher
            .expect_fetch()
            .withf(|url| url == "https://a.example/rss")
            .times(1)
            .returning(move |_| Ok(body.clone()));

        let worker = FetchService::new(
            &fetcher,
            &scratch,
            RecencyFilter::new(1, ScanMode::StopAtFirstStale),
            now(),
        );
        let outcome = worker.run("https://a.example/rss");

        let summary = match outcome {
            Outcome::Fetched(summary) => summary,
            other => panic!("expected success, got {}", other),
        };
        let key = ArtifactKey::for_url("https://a.example/rss");
        let written = std::fs::read_to_string(scratch.artifact_path(&key)).unwrap();

        assert_eq!(summary.channel_title, "Daily Show");
        assert_eq!(summary.bytes_written, written.len());
        assert_eq!(summary.hash_prefix, key.prefix_hex());
        assert!(written.contains("wget -O today.mp3 https://a.example/today.mp3"));
    }

    #[test]
    fn test_fetch_failure_becomes_failed_outcome() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::new(dir.path());
        let mut fetcher = MockFeedFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(PodcastError::HttpStatus(500)));

        let worker = FetchService::new(
            &fetcher,
            &scratch,
            RecencyFilter::new(1, ScanMode::StopAtFirstStale),
            now(),
        );
        let outcome = worker.run("https://a.example/rss");

        assert!(matches!(
            outcome,
            Outcome::Failed { error: PodcastError::HttpStatus(500), .. }
        ));
        assert!(scratch.list_artifacts().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_feed_becomes_failed_outcome() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::new(dir.path());
        let mut fetcher = MockFeedFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(b"<rss><channel><title>oops</rss>".to_vec()));

        let worker = FetchService::new(
            &fetcher,
            &scratch,
            RecencyFilter::new(1, ScanMode::StopAtFirstStale),
            now(),
        );

        assert!(matches!(
            worker.run("https://a.example/rss"),
            Outcome::Failed { error: PodcastError::Parse(_), .. }
        ));
    }

    #[test]
    fn test_unwritable_scratch_becomes_failed_outcome() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::new(dir.path().join("missing"));
        let mut fetcher = MockFeedFetcher::new();
        let body = feed_xml(now());
        fetcher.expect_fetch().returning(move |_| Ok(body.clone()));

        let worker = FetchService::new(
            &fetcher,
            &scratch,
            RecencyFilter::new(1, ScanMode::StopAtFirstStale),
            now(),
        );

        assert!(matches!(
            worker.run("https://a.example/rss"),
            Outcome::Failed { error: PodcastError::Write { .. }, .. }
        ));
    }

    #[test]
    fn test_stale_feed_still_writes_artifact_without_directives() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::new(dir.path());
        let mut fetcher = MockFeedFetcher::new();
        let body = feed_xml(now() - Duration::days(3));
        fetcher.expect_fetch().returning(move |_| Ok(body.clone()));

        let worker = FetchService::new(
            &fetcher,
            &scratch,
            RecencyFilter::new(1, ScanMode::StopAtFirstStale),
            now(),
        );

        assert!(worker.run("https://a.example/rss").is_success());
        let key = ArtifactKey::for_url("https://a.example/rss");
        let written = std::fs::read_to_string(scratch.artifact_path(&key)).unwrap();
        assert!(!written.contains("wget"));
    }
}
