use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::job::JobStatus;

/// Dashboard summary for `GET /api/jobs/stats/overview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub total: u64,
    pub applied: u64,
    /// Interview Scheduled + Interview Completed.
    pub interviews: u64,
    /// Offer Received + Accepted.
    pub offers: u64,
    pub rejected: u64,
    /// Every status, zero counts included.
    pub by_status: BTreeMap<JobStatus, u64>,
}

impl JobStats {
    /// Folds per-status counts (as returned by a GROUP BY) into the summary
    /// buckets. Repeated statuses are summed.
    pub fn from_counts(counts: impl IntoIterator<Item = (JobStatus, u64)>) -> Self {
        let mut by_status: BTreeMap<JobStatus, u64> =
            JobStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for (status, count) in counts {
            *by_status.entry(status).or_insert(0) += count;
        }

        let count = |status: JobStatus| by_status.get(&status).copied().unwrap_or(0);

        JobStats {
            total: by_status.values().sum(),
            applied: count(JobStatus::Applied),
            interviews: count(JobStatus::InterviewScheduled) + count(JobStatus::InterviewCompleted),
            offers: count(JobStatus::OfferReceived) + count(JobStatus::Accepted),
            rejected: count(JobStatus::Rejected),
            by_status,
        }
    }
}
