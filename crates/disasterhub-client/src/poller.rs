use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::feed::ReportFeed;

/// Refresh cadence used by the dashboard.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300_000);

/// Handle to a running poll loop. Dropping it does not stop the loop.
pub struct Poller {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl Poller {
    /// Refreshes `feed` immediately, then every `interval` until stopped.
    ///
    /// Each cycle runs as its own task: a slow fetch does not delay the next
    /// tick, and a cycle already in flight when `stop` is called still lands.
    pub fn spawn(feed: Arc<ReportFeed>, interval: Duration) -> Self {
        let token = CancellationToken::new();
        let task = tokio::spawn(run_poll_loop(feed, interval, token.clone()));
        info!("Report poller started (every {}s)", interval.as_secs());
        Self { token, task }
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stops the loop and waits for it to exit.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.task.await;
        info!("Report poller stopped");
    }
}

async fn run_poll_loop(feed: Arc<ReportFeed>, interval: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                debug!("Poll tick");
                let feed = feed.clone();
                tokio::spawn(async move {
                    feed.refresh().await;
                });
            }
        }
    }
}
