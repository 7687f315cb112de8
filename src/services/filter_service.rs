use chrono::{DateTime, Duration, Utc};

use crate::domain::{Channel, Item};
use crate::time_parser::parse_time;

/// How far down the item list the filter looks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Trust the feed to be newest-first and stop at the first stale item.
    /// An old item served early hides every newer item after it.
    #[default]
    StopAtFirstStale,
    /// Classify every item on its own date.
    FullScan,
}

/// Decides which items of a channel are recent enough to download.
#[derive(Debug, Clone, Copy)]
pub struct RecencyFilter {
    window: Duration,
    mode: ScanMode,
}

impl RecencyFilter {
    pub fn new(days: u32, mode: ScanMode) -> Self {
        Self {
            window: Duration::days(i64::from(days)),
            mode,
        }
    }

    /// Items in scope at `now`, in feed order.
    ///
    /// An item exactly `days` old is still in scope. Items whose date can't be
    /// parsed are skipped without affecting their siblings, and items without
    /// enclosures are never in scope.
    pub fn in_scope<'a>(&self, channel: &'a Channel, now: DateTime<Utc>) -> Vec<&'a Item> {
        let mut selected = Vec::new();

        for item in &channel.items {
            let published = match parse_time(&item.pub_date) {
                Ok(t) => t.with_timezone(&Utc),
                Err(e) => {
                    tracing::debug!(title = %item.title, error = %e, "skipping item");
                    continue;
                }
            };

            if now - published > self.window {
                match self.mode {
                    ScanMode::StopAtFirstStale => break,
                    ScanMode::FullScan => continue,
                }
            }

            if item.has_enclosures() {
                selected.push(item);
            }
        }

        selected
    }
}
