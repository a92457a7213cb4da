//! Transfer summary functionality.
//!
//! This module contains the [`Summary`] struct and [`Status`] enum for
//! tracking per-job results, plus the [`RunReport`] aggregating a whole
//! pool run.

use super::job::TransferJob;

/// Transfer status enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Transfer failed with error message
    Fail(String),
    /// Transfer not yet started
    NotStarted,
    /// Transfer abandoned because shutdown was requested
    Cancelled,
    /// Transfer completed successfully
    Success,
}

/// Represents a [`TransferJob`] summary.
#[derive(Debug, Clone)]
pub struct Summary {
    /// The job this summary describes.
    job: TransferJob,
    /// Transferred size in bytes.
    size: u64,
    /// Status.
    status: Status,
}

impl Summary {
    /// Create a new [`TransferJob`] [`Summary`].
    pub fn new(job: TransferJob) -> Self {
        Self {
            job,
            size: 0,
            status: Status::NotStarted,
        }
    }

    /// Attach a status to a [`Summary`].
    pub fn with_status(self, status: Status) -> Self {
        Self { status, ..self }
    }

    /// Mark the summary as successful with the persisted size.
    pub fn success(self, size: u64) -> Self {
        Self {
            size,
            status: Status::Success,
            ..self
        }
    }

    /// Mark the summary as failed with a message.
    pub fn fail(self, msg: impl std::fmt::Display) -> Self {
        Self {
            status: Status::Fail(format!("{}", msg)),
            ..self
        }
    }

    /// Mark the summary as cancelled.
    pub fn cancelled(self) -> Self {
        self.with_status(Status::Cancelled)
    }

    /// Get a reference to the summary's job.
    pub fn job(&self) -> &TransferJob {
        &self.job
    }

    /// Get the summary's size.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Get a reference to the summary's status.
    pub fn status(&self) -> &Status {
        &self.status
    }
}

/// How a whole pool run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every queued job was dispatched and reported back.
    Completed,
    /// Shutdown was requested before the queue drained.
    Cancelled,
}

/// The aggregated result of one pool run.
#[derive(Debug)]
pub struct RunReport {
    outcome: RunOutcome,
    summaries: Vec<Summary>,
}

impl RunReport {
    pub(crate) fn new(outcome: RunOutcome, summaries: Vec<Summary>) -> Self {
        Self { outcome, summaries }
    }

    /// Get the run's outcome.
    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    /// Get the per-job summaries.
    pub fn summaries(&self) -> &[Summary] {
        &self.summaries
    }

    /// Number of jobs that transferred and persisted successfully.
    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, Status::Success))
    }

    /// Number of jobs that failed.
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, Status::Fail(_)))
    }

    /// Number of jobs abandoned by cancellation.
    pub fn cancelled(&self) -> usize {
        self.count(|s| matches!(s, Status::Cancelled))
    }

    /// Iterate over the failed summaries.
    pub fn failures(&self) -> impl Iterator<Item = &Summary> {
        self.summaries
            .iter()
            .filter(|s| matches!(s.status(), Status::Fail(_)))
    }

    /// Whether the run finished without cancellation or failures.
    pub fn is_complete(&self) -> bool {
        self.outcome == RunOutcome::Completed && self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&Status) -> bool) -> usize {
        self.summaries.iter().filter(|s| pred(s.status())).count()
    }
}
