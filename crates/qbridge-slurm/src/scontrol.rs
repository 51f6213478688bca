//! Single-job detail query via `scontrol show job -o`.

use crate::types::SlurmState;
use qbridge_core::{AdapterError, AllocatedResourceInfo, JobRecord, ParsingError, StateTable};
use qbridge_parsers::{
    MemoryFormat, non_empty_string, parse_key_values, parse_memory_kib, parse_optional_int,
    parse_time_seconds,
};
use std::collections::HashMap;

/// `-o` prints the whole record as one line of KEY=VALUE tokens.
pub fn job_command(job_id: &str) -> String {
    format!("SLURM_TIME_FORMAT='standard' scontrol show job -o {}", job_id)
}

fn optional_int<T: std::str::FromStr>(fields: &HashMap<&str, &str>, key: &str) -> Option<T> {
    let value = fields.get(key)?;
    let parsed = parse_optional_int(value);
    if parsed.is_none() {
        tracing::debug!("scontrol field {}={} is not an integer", key, value);
    }
    parsed
}

fn optional_memory(fields: &HashMap<&str, &str>, key: &str) -> Option<u64> {
    let value = fields.get(key)?;
    parse_memory_kib(value, MemoryFormat::Slurm)
        .inspect_err(|e| tracing::debug!("scontrol field {}: {}", key, e))
        .ok()
}

fn optional_time(fields: &HashMap<&str, &str>, key: &str) -> Option<u64> {
    let value = fields.get(key)?;
    parse_time_seconds(value)
        .inspect_err(|e| tracing::debug!("scontrol field {}: {}", key, e))
        .ok()
        .flatten()
}

fn optional_text(fields: &HashMap<&str, &str>, key: &str) -> Option<String> {
    fields.get(key).and_then(|v| non_empty_string(v))
}

/// "user(1000)" -> "user"
fn strip_uid(user: &str) -> &str {
    user.split_once('(').map_or(user, |(name, _)| name)
}

/// Parse one scontrol record. Only `JobId` and `JobState` are required;
/// every other field degrades to absent.
pub fn parse_job_output(
    stdout: &str,
    states: &StateTable<SlurmState>,
) -> Result<JobRecord, AdapterError> {
    let fields = parse_key_values(stdout)?;

    let job_id = fields
        .get("JobId")
        .and_then(|v| non_empty_string(v))
        .ok_or_else(|| ParsingError::new("scontrol output has no JobId"))?;
    let state_literal = fields
        .get("JobState")
        .ok_or_else(|| ParsingError::new(format!("scontrol output for job {} has no JobState", job_id)))?;
    let state = states.lookup(state_literal)?;

    let mut job = JobRecord::new(job_id, state);
    job.name = optional_text(&fields, "JobName");
    job.account = optional_text(&fields, "UserId").map(|u| strip_uid(&u).to_string());
    job.queue_name = optional_text(&fields, "Partition");
    job.runtime = optional_time(&fields, "RunTime");
    job.exit_status = fields
        .get("ExitCode")
        .and_then(|v| v.split(':').next())
        .and_then(parse_optional_int);
    job.info = AllocatedResourceInfo {
        memory: optional_memory(&fields, "MinMemoryNode"),
        memory_per_cpu: optional_memory(&fields, "MinMemoryCPU"),
        nodes: optional_int(&fields, "NumNodes"),
        cpus: optional_int(&fields, "NumCPUs"),
        threads_per_process: optional_int(&fields, "CPUs/Task"),
        time_limit: optional_time(&fields, "TimeLimit"),
        priority: optional_int(&fields, "Priority"),
        qos: optional_text(&fields, "QOS"),
    };

    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_core::CanonicalState;

    const RUNNING_JOB: &str = "JobId=270 JobName=relax UserId=alice(1000) GroupId=alice(1000) \
        Priority=4294901758 Nice=0 Account=proj01 QOS=normal JobState=RUNNING Reason=None \
        Dependency=(null) Requeue=1 Restarts=0 BatchFlag=1 ExitCode=0:0 RunTime=00:01:02 \
        TimeLimit=1-00:00:00 Partition=debug NumNodes=2 NumCPUs=8 NumTasks=8 CPUs/Task=1 \
        MinCPUsNode=1 MinMemoryCPU=2G MinTmpDiskNode=0\n";

    fn states() -> StateTable<SlurmState> {
        StateTable::new().unwrap()
    }

    #[test]
    fn test_job_command() {
        assert_eq!(
            job_command("270"),
            "SLURM_TIME_FORMAT='standard' scontrol show job -o 270"
        );
    }

    #[test]
    fn test_parse_running_job() {
        let job = parse_job_output(RUNNING_JOB, &states()).unwrap();
        assert_eq!(job.job_id, "270");
        assert_eq!(job.name.as_deref(), Some("relax"));
        assert_eq!(job.state, CanonicalState::Running);
        assert_eq!(job.raw_state, "RUNNING");
        assert_eq!(job.account.as_deref(), Some("alice"));
        assert_eq!(job.queue_name.as_deref(), Some("debug"));
        assert_eq!(job.runtime, Some(62));
        assert_eq!(job.exit_status, Some(0));
        assert_eq!(job.info.nodes, Some(2));
        assert_eq!(job.info.cpus, Some(8));
        assert_eq!(job.info.threads_per_process, Some(1));
        assert_eq!(job.info.memory_per_cpu, Some(2 * 1024 * 1024));
        assert_eq!(job.info.memory, None);
        assert_eq!(job.info.time_limit, Some(86400));
        assert_eq!(job.info.priority, Some(4294901758));
        assert_eq!(job.info.qos.as_deref(), Some("normal"));
    }

    #[test]
    fn test_bad_optional_fields_degrade() {
        let stdout = "JobId=5 JobState=PENDING NumNodes=1-2 TimeLimit=UNLIMITED \
            MinMemoryCPU=lots Priority=high";
        let job = parse_job_output(stdout, &states()).unwrap();
        assert_eq!(job.state, CanonicalState::Queued);
        assert_eq!(job.info.nodes, None);
        assert_eq!(job.info.time_limit, None);
        assert_eq!(job.info.memory_per_cpu, None);
        assert_eq!(job.info.priority, None);
        assert_eq!(job.name, None);
    }

    #[test]
    fn test_unknown_state_is_fatal() {
        let err = parse_job_output("JobId=5 JobState=WEIRD", &states()).unwrap_err();
        assert!(matches!(err, AdapterError::Parsing(_)));
    }

    #[test]
    fn test_missing_state_is_fatal() {
        let err = parse_job_output("JobId=5 JobName=x", &states()).unwrap_err();
        assert!(matches!(err, AdapterError::Parsing(_)));
    }

    #[test]
    fn test_malformed_token_is_fatal() {
        let err = parse_job_output("JobId=5 JobState=RUNNING garbage", &states()).unwrap_err();
        assert!(matches!(err, AdapterError::Parsing(_)));
    }
}
