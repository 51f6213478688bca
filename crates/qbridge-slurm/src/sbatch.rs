//! Acknowledgement parsing for sbatch and scancel.

use once_cell::sync::Lazy;
use qbridge_core::{CancellationOutcome, SubmissionOutcome};
use regex::Regex;

/// sbatch/salloc success line, e.g. "Submitted batch job 12345" or
/// "salloc: Granted job allocation 12345".
static SUBMITTED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.*:\s*)?(granted job allocation|submitted batch job)\s+(?P<jobid>\d+)")
        .expect("valid sbatch regex")
});

/// scancel -v success line, e.g. "scancel: Terminating job 80".
static CANCELLED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*:\s*)?Terminating job\s+(?P<jobid>\d+)").expect("valid scancel regex")
});

fn find_job_id(re: &Regex, text: &str) -> Option<String> {
    text.lines()
        .find_map(|line| re.captures(line.trim()))
        .map(|caps| caps["jobid"].to_string())
}

pub fn parse_submit_output(exit_code: i32, stdout: &str, stderr: &str) -> SubmissionOutcome {
    if exit_code != 0 {
        tracing::debug!("sbatch exited with {}: {}", exit_code, stderr.trim());
        return SubmissionOutcome::classify(exit_code, stdout, stderr, None);
    }

    let job_id = find_job_id(&SUBMITTED_RE, stdout);
    if job_id.is_none() {
        tracing::warn!("sbatch succeeded but no job id found in output: {}", stdout.trim());
    }
    SubmissionOutcome::classify(exit_code, stdout, stderr, job_id)
}

/// scancel reports on stderr, and only with `-v`.
pub fn parse_cancel_output(exit_code: i32, stdout: &str, stderr: &str) -> CancellationOutcome {
    // Possible error messages:
    // scancel: error: No job identification provided
    // scancel: error: Kill job error on job id 958: Invalid job id specified
    if exit_code != 0 {
        tracing::debug!("scancel exited with {}: {}", exit_code, stderr.trim());
        return CancellationOutcome::classify(exit_code, stdout, stderr, None);
    }

    let job_id = find_job_id(&CANCELLED_RE, stderr);
    if job_id.is_none() {
        tracing::warn!("scancel succeeded but no job id found in output: {}", stderr.trim());
    }
    CancellationOutcome::classify(exit_code, stdout, stderr, job_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_core::{CancelStatus, SubmissionStatus};

    #[test]
    fn test_parse_submit_success() {
        let outcome = parse_submit_output(0, "Submitted batch job 12345\n", "");
        assert_eq!(outcome.status, SubmissionStatus::Successful);
        assert_eq!(outcome.job_id.as_deref(), Some("12345"));
        assert_eq!(outcome.stdout, "Submitted batch job 12345\n");
    }

    #[test]
    fn test_parse_submit_salloc_prefix() {
        let outcome = parse_submit_output(0, "salloc: Granted job allocation 77\n", "");
        assert_eq!(outcome.job_id.as_deref(), Some("77"));

        let outcome = parse_submit_output(0, "SUBMITTED BATCH JOB 9", "");
        assert_eq!(outcome.job_id.as_deref(), Some("9"));
    }

    #[test]
    fn test_parse_submit_after_warning_line() {
        let stdout = "sbatch: warning: partition default changed\nSubmitted batch job 500\n";
        let outcome = parse_submit_output(0, stdout, "");
        assert_eq!(outcome.job_id.as_deref(), Some("500"));
    }

    #[test]
    fn test_parse_submit_unknown_id() {
        let outcome = parse_submit_output(0, "something unexpected\n", "");
        assert_eq!(outcome.status, SubmissionStatus::JobIdUnknown);
        assert!(outcome.job_id.is_none());
    }

    #[test]
    fn test_parse_submit_failed() {
        let outcome = parse_submit_output(
            1,
            "",
            "sbatch: error: Batch job submission failed: Invalid account\n",
        );
        assert_eq!(outcome.status, SubmissionStatus::Failed);
        assert_eq!(outcome.exit_code, 1);
    }

    #[test]
    fn test_parse_cancel_success() {
        let outcome = parse_cancel_output(0, "", "scancel: Terminating job 80\n");
        assert_eq!(outcome.status, CancelStatus::Successful);
        assert_eq!(outcome.job_id.as_deref(), Some("80"));
    }

    #[test]
    fn test_parse_cancel_ack_on_stdout_is_ignored() {
        let outcome = parse_cancel_output(0, "scancel: Terminating job 80\n", "");
        assert_eq!(outcome.status, CancelStatus::JobIdUnknown);
    }

    #[test]
    fn test_parse_cancel_failed() {
        let outcome = parse_cancel_output(
            1,
            "",
            "scancel: error: Kill job error on job id 958: Invalid job id specified\n",
        );
        assert_eq!(outcome.status, CancelStatus::Failed);
        assert!(outcome.job_id.is_none());
    }
}
