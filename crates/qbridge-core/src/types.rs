//! Canonical records produced by adapter parsers.

use crate::state::{CanonicalState, RawState};
use serde::{Deserialize, Serialize};

/// Resources the scheduler reports as allocated to a job.
///
/// A value the scheduler printed but that could not be converted is `None`,
/// never zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedResourceInfo {
    /// Memory (KiB)
    pub memory: Option<u64>,
    /// Memory per cpu (KiB)
    pub memory_per_cpu: Option<u64>,
    pub nodes: Option<u32>,
    pub cpus: Option<u32>,
    pub threads_per_process: Option<u32>,
    /// Time limit (seconds)
    pub time_limit: Option<u64>,
    pub priority: Option<i64>,
    pub qos: Option<String>,
}

/// Snapshot of one job as reported by a scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Scheduler-native job id
    pub job_id: String,
    pub name: Option<String>,
    pub exit_status: Option<i32>,
    pub state: CanonicalState,
    /// Long name of the scheduler's own state
    pub raw_state: String,
    pub info: AllocatedResourceInfo,
    /// Owner of the job
    pub account: Option<String>,
    /// Elapsed run time (seconds)
    pub runtime: Option<u64>,
    pub queue_name: Option<String>,
}

impl JobRecord {
    /// Start a record whose canonical state comes from `raw_state`.
    pub fn new<S: RawState>(job_id: impl Into<String>, raw_state: S) -> Self {
        Self {
            job_id: job_id.into(),
            name: None,
            exit_status: None,
            state: raw_state.canonical_state(),
            raw_state: raw_state.name().to_string(),
            info: AllocatedResourceInfo::default(),
            account: None,
            runtime: None,
            queue_name: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Successful,
    /// Non-zero exit: the scheduler rejected the submission.
    Failed,
    /// Zero exit, but no job id could be recovered from the output.
    JobIdUnknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelStatus {
    Successful,
    Failed,
    JobIdUnknown,
}

/// Result of parsing a submit command's captured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub job_id: Option<String>,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub status: SubmissionStatus,
}

impl SubmissionOutcome {
    /// Classify a submission. `job_id` is ignored when `exit_code != 0`, so a
    /// successful outcome always carries an id and a zero exit code.
    pub fn classify(exit_code: i32, stdout: &str, stderr: &str, job_id: Option<String>) -> Self {
        let (job_id, status) = match (exit_code, job_id) {
            (0, Some(id)) => (Some(id), SubmissionStatus::Successful),
            (0, None) => (None, SubmissionStatus::JobIdUnknown),
            _ => (None, SubmissionStatus::Failed),
        };
        Self {
            job_id,
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            status,
        }
    }
}

/// Result of parsing a cancel command's captured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub job_id: Option<String>,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub status: CancelStatus,
}

impl CancellationOutcome {
    pub fn classify(exit_code: i32, stdout: &str, stderr: &str, job_id: Option<String>) -> Self {
        let (job_id, status) = match (exit_code, job_id) {
            (0, Some(id)) => (Some(id), CancelStatus::Successful),
            (0, None) => (None, CancelStatus::JobIdUnknown),
            _ => (None, CancelStatus::Failed),
        };
        Self {
            job_id,
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            status,
        }
    }
}
