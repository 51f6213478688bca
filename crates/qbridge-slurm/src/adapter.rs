//! The SLURM implementation of the scheduler adapter contract.

use crate::types::SlurmState;
use crate::{header, sacct, sbatch, scontrol, squeue};
use camino::Utf8Path;
use qbridge_core::{
    AdapterError, CancellationOutcome, JobRecord, ResourceField, ResourceRequest,
    SchedulerAdapter, StateTable, SubmissionOutcome,
};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Executable used for single-job queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobQueryExecutable {
    /// Only knows queued, running and recently finished jobs.
    #[default]
    Scontrol,
    /// Needs slurmdbd accounting, but also knows old jobs.
    Sacct,
}

impl JobQueryExecutable {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scontrol => "scontrol",
            Self::Sacct => "sacct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SlurmConfig {
    pub job_query_executable: JobQueryExecutable,
    /// Column separator for squeue output; must not occur in any field.
    pub split_separator: String,
}

impl Default for SlurmConfig {
    fn default() -> Self {
        Self {
            job_query_executable: JobQueryExecutable::Scontrol,
            split_separator: "<><>".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlurmAdapter {
    config: SlurmConfig,
    states: StateTable<SlurmState>,
}

impl SlurmAdapter {
    pub fn new(config: SlurmConfig) -> Result<Self, AdapterError> {
        if config.split_separator.trim().is_empty() {
            return Err(AdapterError::InvalidArgument(
                "split_separator must contain a non-whitespace character".to_string(),
            ));
        }
        if config.split_separator.contains('\'') {
            return Err(AdapterError::InvalidArgument(
                "split_separator must not contain a single quote".to_string(),
            ));
        }
        let states = StateTable::new()?;
        Ok(Self { config, states })
    }

    pub fn config(&self) -> &SlurmConfig {
        &self.config
    }

    /// Resolve a SLURM state literal (long name or compact code).
    pub fn lookup_state(&self, literal: &str) -> Result<SlurmState, AdapterError> {
        Ok(self.states.lookup(literal)?)
    }

    fn require_success(
        &self,
        command: &str,
        exit_code: i32,
        stderr: &str,
    ) -> Result<(), AdapterError> {
        if exit_code != 0 {
            return Err(AdapterError::CommandFailed {
                command: command.to_string(),
                exit_code,
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

impl SchedulerAdapter for SlurmAdapter {
    fn scheduler(&self) -> &'static str {
        "slurm"
    }

    fn build_submission_script_header(
        &self,
        resources: &ResourceRequest,
    ) -> Result<String, AdapterError> {
        self.check_resources(resources)?;
        Ok(header::render_header(resources))
    }

    fn submit_command(&self, script_file: &Utf8Path) -> String {
        format!("sbatch {}", script_file)
    }

    fn cancel_command(&self, job_id: &str) -> String {
        // Without -v scancel reports nothing on success.
        format!("scancel -v {}", job_id)
    }

    fn job_query_command(&self, job_id: &str) -> String {
        match self.config.job_query_executable {
            JobQueryExecutable::Scontrol => scontrol::job_command(job_id),
            JobQueryExecutable::Sacct => sacct::job_command(job_id),
        }
    }

    fn jobs_list_command(
        &self,
        job_ids: Option<&[String]>,
        user: Option<&str>,
    ) -> Result<String, AdapterError> {
        squeue::jobs_list_command(&self.config.split_separator, job_ids, user)
    }

    fn parse_submit_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> SubmissionOutcome {
        sbatch::parse_submit_output(exit_code, stdout, stderr)
    }

    fn parse_cancel_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> CancellationOutcome {
        sbatch::parse_cancel_output(exit_code, stdout, stderr)
    }

    fn parse_job_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Result<JobRecord, AdapterError> {
        let executable = self.config.job_query_executable;
        self.require_success(executable.as_str(), exit_code, stderr)?;
        match executable {
            JobQueryExecutable::Scontrol => scontrol::parse_job_output(stdout, &self.states),
            JobQueryExecutable::Sacct => sacct::parse_job_output(stdout, &self.states),
        }
    }

    fn parse_jobs_list_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Result<Vec<JobRecord>, AdapterError> {
        self.require_success("squeue", exit_code, stderr)?;
        squeue::parse_jobs_list_output(stdout, &self.config.split_separator, &self.states)
    }

    fn supported_resource_fields(&self) -> BTreeSet<ResourceField> {
        header::supported_fields()
    }

    fn supported_extras(&self) -> BTreeSet<&'static str> {
        header::supported_extras()
    }
}
