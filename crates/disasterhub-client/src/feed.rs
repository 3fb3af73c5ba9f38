use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use disasterhub_types::models::{Report, VoteDirection};

use crate::fallback::mock_reports;
use crate::normalize::{StatusMapping, normalize_predictions};
use crate::source::ReportSource;
use crate::store::{MergePolicy, ReportStore};

/// What the presentation layer reads: a viewer's reports plus status flags.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub reports: Vec<Report>,
    pub error: Option<String>,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub count: usize,
    pub fallback: bool,
}

/// Fetch → normalize → store pipeline shared by the poller and the API.
///
/// Holds the latest report list and one [`ReportStore`] per viewer, so each
/// viewer has exactly one vote per report.
pub struct ReportFeed {
    source: Arc<dyn ReportSource>,
    mapping: StatusMapping,
    policy: MergePolicy,
    inner: RwLock<FeedState>,
}

#[derive(Default)]
struct FeedState {
    latest: Vec<Report>,
    error: Option<String>,
    in_flight: usize,
    last_updated: Option<DateTime<Utc>>,
    viewers: HashMap<String, ReportStore>,
}

impl ReportFeed {
    pub fn new(source: Arc<dyn ReportSource>, mapping: StatusMapping, policy: MergePolicy) -> Self {
        Self {
            source,
            mapping,
            policy,
            inner: RwLock::new(FeedState::default()),
        }
    }

    /// Runs one fetch cycle. On any failure the error flag is set and the
    /// mock report set is installed instead.
    pub async fn refresh(&self) -> RefreshOutcome {
        {
            let mut state = self.inner.write().await;
            state.in_flight += 1;
        }

        // No lock is held across the fetch; concurrent cycles race and
        // whichever finishes last wins.
        let result = self.source.fetch().await;

        let mut state = self.inner.write().await;
        state.in_flight = state.in_flight.saturating_sub(1);

        let (reports, fallback) = match result {
            Ok(payload) => {
                state.error = None;
                (normalize_predictions(&payload, self.mapping), false)
            }
            Err(e) => {
                warn!("Failed to load reports: {}. Falling back to mock data", e);
                state.error = Some(e.to_string());
                (mock_reports(Utc::now(), self.mapping), true)
            }
        };

        let count = reports.len();
        for store in state.viewers.values_mut() {
            store.refresh(reports.clone());
        }
        state.latest = reports;
        state.last_updated = Some(Utc::now());

        info!("Report feed refreshed: {} reports (fallback={})", count, fallback);
        RefreshOutcome { count, fallback }
    }

    /// Reports as the given viewer sees them.
    pub async fn snapshot(&self, viewer: &str) -> FeedSnapshot {
        let mut state = self.inner.write().await;
        let reports = state.viewer_store(viewer, self.policy).reports().to_vec();
        FeedSnapshot {
            reports,
            error: state.error.clone(),
            loading: state.in_flight > 0,
            last_updated: state.last_updated,
        }
    }

    pub async fn report(&self, viewer: &str, id: &str) -> Option<Report> {
        let mut state = self.inner.write().await;
        state.viewer_store(viewer, self.policy).get(id).cloned()
    }

    /// Applies a vote for `viewer`. Unknown ids change nothing and return `None`.
    pub async fn vote(&self, viewer: &str, id: &str, direction: VoteDirection) -> Option<Report> {
        let mut state = self.inner.write().await;
        state
            .viewer_store(viewer, self.policy)
            .vote(id, direction)
            .cloned()
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.read().await.error.clone()
    }

    pub async fn latest(&self) -> Vec<Report> {
        self.inner.read().await.latest.clone()
    }
}

impl FeedState {
    fn viewer_store(&mut self, viewer: &str, policy: MergePolicy) -> &mut ReportStore {
        let latest = &self.latest;
        self.viewers
            .entry(viewer.to_string())
            .or_insert_with(|| ReportStore::with_reports(latest.clone(), policy))
    }
}
