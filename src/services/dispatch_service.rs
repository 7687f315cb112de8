use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;

use crate::domain::Outcome;
use crate::errors::PodcastError;
use crate::services::fetch_service::FetchService;

/// Run one worker per feed and wait for all of them.
///
/// Every feed gets its own thread and every thread sends exactly one
/// [`Outcome`] back, so the receive loop below doubles as the completion
/// barrier. `on_outcome` sees each outcome as it arrives; the returned Vec
/// keeps that arrival order.
pub fn dispatch<F>(worker: &FetchService<'_>, feeds: &[String], mut on_outcome: F) -> Vec<Outcome>
where
    F: FnMut(&Outcome),
{
    let (tx, rx) = mpsc::channel();
    let mut outcomes = Vec::with_capacity(feeds.len());

    thread::scope(|scope| {
        for (index, url) in feeds.iter().enumerate() {
            let worker_tx = tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("feed-{}", index))
                .spawn_scoped(scope, move || {
                    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| worker.run(url))) {
                        Ok(outcome) => outcome,
                        Err(payload) => Outcome::Failed {
                            url: url.clone(),
                            error: PodcastError::WorkerPanic(panic_message(payload.as_ref())),
                        },
                    };
                    // The receiver only goes away once every outcome is in.
                    let _ = worker_tx.send(outcome);
                });

            if let Err(e) = spawned {
                tracing::warn!(url = %url, error = %e, "couldn't spawn worker");
                let _ = tx.send(Outcome::Failed {
                    url: url.clone(),
                    error: PodcastError::Io(e),
                });
            }
        }
        drop(tx);

        for _ in 0..feeds.len() {
            match rx.recv() {
                Ok(outcome) => {
                    on_outcome(&outcome);
                    outcomes.push(outcome);
                }
                Err(_) => break,
            }
        }
    });

    tracing::info!(
        feeds = feeds.len(),
        failed = outcomes.iter().filter(|o| !o.is_success()).count(),
        "all workers finished"
    );

    outcomes
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
