//! Single-job query via sacct, for jobs scontrol has already forgotten.

use crate::types::SlurmState;
use qbridge_core::{AdapterError, AllocatedResourceInfo, JobRecord, ParsingError, StateTable};
use qbridge_parsers::{
    MemoryFormat, non_empty_string, parse_memory_kib, parse_optional_int, parse_time_seconds,
    split_exact,
};

/// sacct output format (--parsable2 uses | delimiter)
const SACCT_FIELDS: &[&str] = &[
    "JobIDRaw",
    "JobName",
    "State",
    "Partition",
    "User",
    "AllocNodes",
    "AllocCPUS",
    "ReqMem",
    "Timelimit",
    "Elapsed",
    "ExitCode",
    "QOS",
];

pub fn job_command(job_id: &str) -> String {
    format!(
        "SLURM_TIME_FORMAT='standard' sacct -j {} -X --parsable2 --noheader --format={}",
        job_id,
        SACCT_FIELDS.join(",")
    )
}

/// Requested memory. A `c` suffix means per cpu and an `n` suffix per
/// node; without a suffix the value is per node.
fn requested_memory(s: &str) -> (Option<u64>, Option<u64>) {
    let s = s.trim();
    let memory = parse_memory_kib(s, MemoryFormat::SlurmSacct)
        .inspect_err(|e| tracing::debug!("sacct ReqMem: {}", e))
        .ok();
    if s.ends_with('c') {
        (None, memory)
    } else {
        (memory, None)
    }
}

pub fn parse_job_output(
    stdout: &str,
    states: &StateTable<SlurmState>,
) -> Result<JobRecord, AdapterError> {
    let line = stdout
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or_else(|| ParsingError::new("sacct returned no job record"))?;
    let fields = split_exact(line, "|", SACCT_FIELDS.len())?;

    // sacct states can have suffixes like "CANCELLED by 12345"
    let base_state = fields[2].split_whitespace().next().unwrap_or(fields[2]);
    let state = states.lookup(base_state)?;

    let job_id = non_empty_string(fields[0])
        .ok_or_else(|| ParsingError::new(format!("sacct row has no job id: {}", line)))?;
    let (memory, memory_per_cpu) = requested_memory(fields[7]);

    let mut job = JobRecord::new(job_id, state);
    job.name = non_empty_string(fields[1]);
    job.queue_name = non_empty_string(fields[3]);
    job.account = non_empty_string(fields[4]);
    job.runtime = parse_time_seconds(fields[9]).ok().flatten();
    job.exit_status = fields[10].split(':').next().and_then(parse_optional_int);
    job.info = AllocatedResourceInfo {
        memory,
        memory_per_cpu,
        nodes: parse_optional_int(fields[5]),
        cpus: parse_optional_int(fields[6]),
        time_limit: parse_time_seconds(fields[8]).ok().flatten(),
        qos: non_empty_string(fields[11]),
        ..Default::default()
    };

    Ok(job)
}
