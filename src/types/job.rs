//! Status of a bulk download job as reported by the backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a download job.
///
/// The backend creates jobs in `Started`, moves them to `Downloading`
/// while the worker runs, and finishes in `Completed` or `Error`. Only
/// the last two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Started,
    Downloading,
    Completed,
    Error,
}

impl JobState {
    /// Whether this state ends the polling loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Error)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobState::Started => "started",
            JobState::Downloading => "downloading",
            JobState::Completed => "completed",
            JobState::Error => "error",
        };
        write!(f, "{}", label)
    }
}

/// Acknowledgement returned when a download job is accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedJob {
    /// Identifier to poll via the status endpoint.
    pub task_id: String,
    /// Initial state, normally "started".
    pub status: String,
}

/// One snapshot of a job's progress, as returned by `/api/status/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: JobState,
    /// Items finished so far.
    pub progress: u64,
    /// Total number of items the job will process. Zero until the worker
    /// has expanded the request into its region/interval/variable grid.
    pub total: u64,
    /// Label of the item currently being processed.
    #[serde(default)]
    pub current_item: String,
    /// Failure message, set when `status` is [`JobState::Error`].
    #[serde(default)]
    pub error: Option<String>,
    /// Paths of files the job has produced so far.
    #[serde(default)]
    pub files: Vec<String>,
    /// Wall-clock time since the job started, formatted by the backend.
    #[serde(default)]
    pub elapsed_time: Option<String>,
}

impl JobStatus {
    /// Completion percentage, `progress / total * 100`.
    ///
    /// Returns `0.0` while `total` is still zero, matching how the portal
    /// renders a job that has not expanded its work list yet.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.progress as f64 / self.total as f64 * 100.0
        }
    }
}
