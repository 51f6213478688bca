//! Job-list queries via squeue.

use crate::types::SlurmState;
use qbridge_core::{AdapterError, AllocatedResourceInfo, JobRecord, StateTable};
use qbridge_parsers::{
    MemoryFormat, non_empty_string, parse_memory_kib, parse_optional_int, parse_time_seconds,
    split_exact,
};
use std::collections::HashSet;

/// squeue output fields, in column order:
/// %i - job or job step id
/// %t - job state in compact form
/// %r - reason for the job being in its current state
/// %j - job name
/// %u - user name
/// %P - partition
/// %l - time limit (days-hours:minutes:seconds)
/// %D - number of nodes allocated
/// %C - number of cpus allocated
/// %M - time used (days-hours:minutes:seconds)
/// %m - minimum memory requested (MB)
pub const SQUEUE_FIELDS: &[(&str, &str)] = &[
    ("%i", "job_id"),
    ("%t", "state_raw"),
    ("%r", "annotation"),
    ("%j", "job_name"),
    ("%u", "username"),
    ("%P", "partition"),
    ("%l", "time_limit"),
    ("%D", "number_nodes"),
    ("%C", "number_cpus"),
    ("%M", "time_used"),
    ("%m", "min_memory"),
];

/// Build the squeue invocation. `job_ids` and `user` are mutually exclusive.
pub fn jobs_list_command(
    separator: &str,
    job_ids: Option<&[String]>,
    user: Option<&str>,
) -> Result<String, AdapterError> {
    let job_ids = job_ids.filter(|ids| !ids.is_empty());
    if job_ids.is_some() && user.is_some() {
        return Err(AdapterError::InvalidArgument(
            "cannot query SLURM by user and job ids at the same time".to_string(),
        ));
    }

    // The trailing space keeps empty columns distinguishable.
    let format = SQUEUE_FIELDS
        .iter()
        .map(|(code, _)| *code)
        .collect::<Vec<_>>()
        .join(format!("{} ", separator).as_str());

    let mut command = vec![
        "SLURM_TIME_FORMAT='standard'".to_string(),
        "squeue".to_string(),
        "--noheader".to_string(),
        format!("-o '{}'", format),
    ];

    if let Some(user) = user {
        command.push(format!("--user={}", user));
    }

    if let Some(ids) = job_ids {
        // squeue prints a different shape for a single id, and errors out
        // if that job is gone. Repeating the id forces the multi-id form.
        let ids = if let [only] = ids {
            vec![only.as_str(), only.as_str()]
        } else {
            ids.iter().map(String::as_str).collect()
        };
        command.push(format!("--jobs={}", ids.join(",")));
    }

    Ok(command.join(" "))
}

fn parse_row(
    fields: &[&str],
    states: &StateTable<SlurmState>,
) -> Result<JobRecord, AdapterError> {
    let job_id = fields[0];
    if job_id.is_empty() {
        return Err(AdapterError::parsing(format!(
            "squeue row has no job id: {}",
            fields.join(" ")
        )));
    }
    let state = states.lookup(fields[1]).map_err(|_| {
        AdapterError::parsing(format!("Unknown job state {} for job id {}", fields[1], job_id))
    })?;

    let mut job = JobRecord::new(job_id, state);
    job.name = non_empty_string(fields[3]);
    job.account = non_empty_string(fields[4]);
    job.queue_name = non_empty_string(fields[5]);
    // A job that has not started usually reports 0:00; anything unparsable
    // is treated as unknown.
    job.runtime = parse_time_seconds(fields[9]).ok().flatten();
    job.info = AllocatedResourceInfo {
        nodes: parse_optional_int(fields[7]),
        cpus: parse_optional_int(fields[8]),
        memory_per_cpu: parse_memory_kib(fields[10], MemoryFormat::Slurm).ok(),
        time_limit: parse_time_seconds(fields[6])?,
        ..Default::default()
    };
    Ok(job)
}

/// Parse squeue rows. Any malformed row fails the whole call.
///
/// Rows repeating an already-seen job id are dropped, since a repeated
/// `--jobs` filter can make squeue print the same job twice.
pub fn parse_jobs_list_output(
    stdout: &str,
    separator: &str,
    states: &StateTable<SlurmState>,
) -> Result<Vec<JobRecord>, AdapterError> {
    let mut seen = HashSet::new();
    let mut jobs = Vec::new();

    for line in stdout.lines().filter(|l| l.contains(separator)) {
        let fields = split_exact(line, separator, SQUEUE_FIELDS.len())?;
        let job = parse_row(&fields, states)?;
        if seen.insert(job.job_id.clone()) {
            jobs.push(job);
        } else {
            tracing::debug!("Dropping duplicate squeue row for job {}", job.job_id);
        }
    }

    Ok(jobs)
}
