use std::collections::HashMap;
use std::str::FromStr;

use disasterhub_types::models::{Report, UserVote, VoteDirection};

/// What happens to existing reports when a fresh fetch lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Fresh data wins outright; vote state is discarded.
    #[default]
    Replace,
    /// Reports whose id survives keep their counters and the viewer's vote.
    MergeById,
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Self::Replace),
            "merge" => Ok(Self::MergeById),
            other => Err(format!("unknown merge policy: {}", other)),
        }
    }
}

/// Ordered reports for one viewer, with toggle voting.
#[derive(Debug, Clone, Default)]
pub struct ReportStore {
    reports: Vec<Report>,
    policy: MergePolicy,
}

impl ReportStore {
    pub fn with_reports(reports: Vec<Report>, policy: MergePolicy) -> Self {
        Self { reports, policy }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn get(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn upvote(&mut self, id: &str) -> Option<&Report> {
        self.vote(id, VoteDirection::Up)
    }

    pub fn downvote(&mut self, id: &str) -> Option<&Report> {
        self.vote(id, VoteDirection::Down)
    }

    /// Applies a vote and returns the updated report. Unknown ids are ignored.
    pub fn vote(&mut self, id: &str, direction: VoteDirection) -> Option<&Report> {
        let slot = self.reports.iter_mut().find(|r| r.id == id)?;
        *slot = apply_vote(slot, direction);
        Some(slot)
    }

    /// Installs a freshly fetched report list according to the merge policy.
    pub fn refresh(&mut self, incoming: Vec<Report>) {
        match self.policy {
            MergePolicy::Replace => self.reports = incoming,
            MergePolicy::MergeById => {
                let mut previous: HashMap<String, Report> = std::mem::take(&mut self.reports)
                    .into_iter()
                    .map(|r| (r.id.clone(), r))
                    .collect();

                self.reports = incoming
                    .into_iter()
                    .map(|mut report| {
                        if let Some(old) = previous.remove(&report.id) {
                            report.upvotes = old.upvotes;
                            report.downvotes = old.downvotes;
                            report.user_vote = old.user_vote;
                        }
                        report
                    })
                    .collect();
            }
        }
    }
}

/// Computes the report after one vote, without touching the input.
///
/// Same direction again retracts; the opposite direction switches;
/// otherwise the vote is counted fresh.
pub fn apply_vote(report: &Report, direction: VoteDirection) -> Report {
    let mut next = report.clone();

    match (report.user_vote, direction) {
        (UserVote::Up, VoteDirection::Up) => {
            next.upvotes = report.upvotes.saturating_sub(1);
            next.user_vote = UserVote::None;
        }
        (UserVote::Down, VoteDirection::Down) => {
            next.downvotes = report.downvotes.saturating_sub(1);
            next.user_vote = UserVote::None;
        }
        (UserVote::Down, VoteDirection::Up) => {
            next.downvotes = report.downvotes.saturating_sub(1);
            next.upvotes = report.upvotes + 1;
            next.user_vote = direction.into();
        }
        (UserVote::Up, VoteDirection::Down) => {
            next.upvotes = report.upvotes.saturating_sub(1);
            next.downvotes = report.downvotes + 1;
            next.user_vote = direction.into();
        }
        (UserVote::None, VoteDirection::Up) => {
            next.upvotes = report.upvotes + 1;
            next.user_vote = direction.into();
        }
        (UserVote::None, VoteDirection::Down) => {
            next.downvotes = report.downvotes + 1;
            next.user_vote = direction.into();
        }
    }

    next
}
