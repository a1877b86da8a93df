//! Progress reporting for polled jobs and batch downloads.

use crate::api::error::ApiError;
use crate::types::job::JobStatus;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Status request for task '{task_id}' failed, polling aborted")]
    StatusRequest {
        task_id: String,
        #[source]
        source: ApiError,
    },
}

/// Receives progress notifications from the polling loop and the ASOS
/// batch driver. All methods have empty defaults; implement only what
/// the caller cares about.
pub trait ProgressSink: Send + Sync {
    /// Called after every successful status poll of a bulk download job.
    fn job_status(&self, _status: &JobStatus) {}

    /// Called before a station request of an ASOS batch starts.
    /// `done` counts stations already finished out of `total`.
    fn station_started(&self, _done: usize, _total: usize, _code: &str) {}

    /// Called after a station finishes, whether it succeeded or failed.
    fn station_finished(&self, _done: usize, _total: usize, _code: &str) {}
}

/// Outcome of one ASOS batch download.
///
/// The batch keeps going past per-station failures, so both lists can be
/// populated at once; `is_complete` distinguishes a clean run.
#[derive(Debug, Default)]
pub struct AsosReport {
    /// CSV files written, in station order.
    pub saved: Vec<PathBuf>,
    /// Stations whose download failed, with the cause.
    pub failures: Vec<AsosFailure>,
}

impl AsosReport {
    /// True when every requested station produced a file.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct AsosFailure {
    /// Station code whose download failed.
    pub station: String,
    pub error: crate::error::PortalError,
}
