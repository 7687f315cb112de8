use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::errors::{PodcastError, PodcastResult};
use crate::sources::traits::FeedFetcher;

/// Blocking HTTP fetcher. Every request carries the client's deadline, so a
/// hanging server turns into a [`PodcastError::Timeout`] instead of a stall.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> PodcastResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("podcasts/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    fn check_status(url: &str, response: Response) -> PodcastResult<Response> {
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, %status, "non-success status");
            return Err(PodcastError::HttpStatus(status.as_u16()));
        }
        Ok(response)
    }
}

fn classify(url: &str, err: reqwest::Error) -> PodcastError {
    if err.is_timeout() {
        PodcastError::Timeout(url.to_string())
    } else {
        PodcastError::Fetch(err)
    }
}

impl FeedFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> PodcastResult<Vec<u8>> {
        let response = self.client.get(url).send().map_err(|e| classify(url, e))?;
        let response = Self::check_status(url, response)?;
        let bytes = response.bytes().map_err(|e| classify(url, e))?;

        Ok(bytes.to_vec())
    }

    fn probe(&self, url: &str) -> PodcastResult<()> {
        // Plenty of hosts refuse HEAD, so any answer counts as reachable.
        let response = self.client.head(url).send().map_err(|e| classify(url, e))?;
        if !response.status().is_success() {
            tracing::warn!(url, status = %response.status(), "feed answered HEAD with non-success status");
        }
        Ok(())
    }
}
