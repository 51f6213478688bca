//! Job queries via bjobs.

use crate::types::LsfState;
use qbridge_core::{AdapterError, AllocatedResourceInfo, JobRecord, ParsingError, StateTable};
use qbridge_parsers::{
    MemoryFormat, non_empty_string, parse_memory_kib, parse_optional_int, split_exact,
};
use std::collections::HashSet;

/// bjobs -o columns:
/// JOBID STAT USER QUEUE JOB_NAME NEXEC_HOST SLOTS RUN_TIME RUNTIMELIMIT MEMLIMIT EXIT_CODE
pub const BJOBS_FIELDS: &[&str] = &[
    "jobid",
    "stat",
    "user",
    "queue",
    "job_name",
    "nexec_host",
    "slots",
    "run_time",
    "runtimelimit",
    "memlimit",
    "exit_code",
];

fn base_command(separator: &str) -> String {
    format!(
        "bjobs -a -noheader -o \"{} delimiter='{}'\"",
        BJOBS_FIELDS.join(" "),
        separator
    )
}

pub fn job_command(separator: &str, job_id: &str) -> String {
    format!("{} {}", base_command(separator), job_id)
}

pub fn jobs_list_command(
    separator: &str,
    job_ids: Option<&[String]>,
    user: Option<&str>,
) -> Result<String, AdapterError> {
    let job_ids = job_ids.filter(|ids| !ids.is_empty());
    let mut command = base_command(separator);
    match (job_ids, user) {
        (Some(_), Some(_)) => {
            return Err(AdapterError::InvalidArgument(
                "cannot query LSF by user and job ids at the same time".to_string(),
            ));
        }
        (Some(ids), None) => {
            command.push(' ');
            command.push_str(&ids.join(" "));
        }
        (None, Some(user)) => {
            command.push_str(&format!(" -u {}", user));
        }
        (None, None) => {}
    }
    Ok(command)
}

/// "74 second(s)" -> 74
fn parse_run_time(s: &str) -> Option<u64> {
    s.split_whitespace().next().and_then(parse_optional_int)
}

/// "1440.0/host" (minutes) -> seconds
fn parse_run_limit(s: &str) -> Option<u64> {
    let minutes: f64 = s.split('/').next()?.trim().parse().ok()?;
    (minutes.is_finite() && minutes >= 0.0).then(|| (minutes * 60.0).round() as u64)
}

fn parse_row(fields: &[&str], states: &StateTable<LsfState>) -> Result<JobRecord, AdapterError> {
    let job_id = fields[0];
    if job_id.is_empty() {
        return Err(AdapterError::parsing(format!(
            "bjobs row has no job id: {}",
            fields.join(" ")
        )));
    }
    let state = states.lookup(fields[1]).map_err(|_| {
        AdapterError::parsing(format!("Unknown job state {} for job id {}", fields[1], job_id))
    })?;

    let mut job = JobRecord::new(job_id, state);
    job.account = non_empty_string(fields[2]);
    job.queue_name = non_empty_string(fields[3]);
    job.name = non_empty_string(fields[4]);
    job.runtime = parse_run_time(fields[7]);
    job.exit_status = parse_optional_int(fields[10]);
    job.info = AllocatedResourceInfo {
        nodes: parse_optional_int(fields[5]),
        cpus: parse_optional_int(fields[6]),
        time_limit: parse_run_limit(fields[8]),
        memory: parse_memory_kib(fields[9], MemoryFormat::Lsf).ok(),
        ..Default::default()
    };
    Ok(job)
}

pub fn parse_jobs_list_output(
    stdout: &str,
    separator: &str,
    states: &StateTable<LsfState>,
) -> Result<Vec<JobRecord>, AdapterError> {
    let mut seen = HashSet::new();
    let mut jobs = Vec::new();

    for line in stdout.lines().filter(|l| l.contains(separator)) {
        let fields = split_exact(line, separator, BJOBS_FIELDS.len())?;
        let job = parse_row(&fields, states)?;
        if seen.insert(job.job_id.clone()) {
            jobs.push(job);
        } else {
            tracing::debug!("Dropping duplicate bjobs row for job {}", job.job_id);
        }
    }

    Ok(jobs)
}

/// A single-job query must yield exactly one record.
pub fn parse_job_output(
    stdout: &str,
    separator: &str,
    states: &StateTable<LsfState>,
) -> Result<JobRecord, AdapterError> {
    let mut jobs = parse_jobs_list_output(stdout, separator, states)?;
    match jobs.len() {
        1 => Ok(jobs.remove(0)),
        n => Err(ParsingError::new(format!("Expected one bjobs record, found {}", n)).into()),
    }
}
