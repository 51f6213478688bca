//! Acknowledgement parsing for bsub and bkill.

use once_cell::sync::Lazy;
use qbridge_core::{CancellationOutcome, SubmissionOutcome};
use regex::Regex;

/// e.g. "Job <12345> is submitted to queue <normal>."
static SUBMITTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Job <(?P<jobid>\d+)> is submitted").expect("valid bsub regex")
});

/// e.g. "Job <12345> is being terminated"
static TERMINATED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Job <(?P<jobid>\d+)> is being (terminated|signaled)").expect("valid bkill regex")
});

fn find_job_id(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|caps| caps["jobid"].to_string())
}

pub fn parse_submit_output(exit_code: i32, stdout: &str, stderr: &str) -> SubmissionOutcome {
    if exit_code != 0 {
        tracing::debug!("bsub exited with {}: {}", exit_code, stderr.trim());
        return SubmissionOutcome::classify(exit_code, stdout, stderr, None);
    }

    let job_id = find_job_id(&SUBMITTED_RE, stdout);
    if job_id.is_none() {
        tracing::warn!("bsub succeeded but no job id found in output: {}", stdout.trim());
    }
    SubmissionOutcome::classify(exit_code, stdout, stderr, job_id)
}

pub fn parse_cancel_output(exit_code: i32, stdout: &str, stderr: &str) -> CancellationOutcome {
    if exit_code != 0 {
        tracing::debug!("bkill exited with {}: {}", exit_code, stderr.trim());
        return CancellationOutcome::classify(exit_code, stdout, stderr, None);
    }

    let job_id = find_job_id(&TERMINATED_RE, stdout);
    if job_id.is_none() {
        tracing::warn!("bkill succeeded but no job id found in output: {}", stdout.trim());
    }
    CancellationOutcome::classify(exit_code, stdout, stderr, job_id)
}
