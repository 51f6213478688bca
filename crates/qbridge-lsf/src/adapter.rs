//! The LSF implementation of the scheduler adapter contract.

use crate::types::LsfState;
use crate::{bjobs, bsub, header};
use camino::Utf8Path;
use qbridge_core::{
    AdapterError, CancellationOutcome, JobRecord, ResourceField, ResourceRequest,
    SchedulerAdapter, StateTable, SubmissionOutcome,
};
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LsfConfig {
    /// Column delimiter passed to `bjobs -o`; must not occur in any field.
    pub split_separator: String,
}

impl Default for LsfConfig {
    fn default() -> Self {
        Self {
            split_separator: "<><>".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LsfAdapter {
    config: LsfConfig,
    states: StateTable<LsfState>,
}

impl LsfAdapter {
    pub fn new(config: LsfConfig) -> Result<Self, AdapterError> {
        let separator = &config.split_separator;
        if separator.trim().is_empty() || separator.contains(['\'', '"']) {
            return Err(AdapterError::InvalidArgument(format!(
                "unusable bjobs delimiter '{}'",
                separator
            )));
        }
        let states = StateTable::new()?;
        Ok(Self { config, states })
    }

    pub fn config(&self) -> &LsfConfig {
        &self.config
    }

    fn require_success(exit_code: i32, stderr: &str) -> Result<(), AdapterError> {
        if exit_code != 0 {
            return Err(AdapterError::CommandFailed {
                command: "bjobs".to_string(),
                exit_code,
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

impl SchedulerAdapter for LsfAdapter {
    fn scheduler(&self) -> &'static str {
        "lsf"
    }

    fn build_submission_script_header(
        &self,
        resources: &ResourceRequest,
    ) -> Result<String, AdapterError> {
        self.check_resources(resources)?;
        Ok(header::render_header(resources))
    }

    /// bsub only reads `#BSUB` directives from a script given on stdin.
    fn submit_command(&self, script_file: &Utf8Path) -> String {
        format!("bsub < {}", script_file)
    }

    fn cancel_command(&self, job_id: &str) -> String {
        format!("bkill {}", job_id)
    }

    fn job_query_command(&self, job_id: &str) -> String {
        bjobs::job_command(&self.config.split_separator, job_id)
    }

    fn jobs_list_command(
        &self,
        job_ids: Option<&[String]>,
        user: Option<&str>,
    ) -> Result<String, AdapterError> {
        bjobs::jobs_list_command(&self.config.split_separator, job_ids, user)
    }

    fn parse_submit_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> SubmissionOutcome {
        bsub::parse_submit_output(exit_code, stdout, stderr)
    }

    fn parse_cancel_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> CancellationOutcome {
        bsub::parse_cancel_output(exit_code, stdout, stderr)
    }

    fn parse_job_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Result<JobRecord, AdapterError> {
        Self::require_success(exit_code, stderr)?;
        bjobs::parse_job_output(stdout, &self.config.split_separator, &self.states)
    }

    fn parse_jobs_list_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Result<Vec<JobRecord>, AdapterError> {
        Self::require_success(exit_code, stderr)?;
        bjobs::parse_jobs_list_output(stdout, &self.config.split_separator, &self.states)
    }

    fn supported_resource_fields(&self) -> BTreeSet<ResourceField> {
        header::supported_fields()
    }

    fn supported_extras(&self) -> BTreeSet<&'static str> {
        header::supported_extras()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_core::CanonicalState;

    fn adapter() -> LsfAdapter {
        LsfAdapter::new(LsfConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_quoting_separator() {
        let config = LsfConfig {
            split_separator: "'".to_string(),
        };
        assert!(LsfAdapter::new(config).is_err());
    }

    #[test]
    fn test_config_from_json() {
        let config: LsfConfig = serde_json::from_str(r#"{"split_separator": "@@"}"#).unwrap();
        let lsf = LsfAdapter::new(config).unwrap();
        assert!(lsf.job_query_command("5").contains("delimiter='@@'"));

        let config: LsfConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LsfConfig::default());
    }

    #[test]
    fn test_commands() {
        let lsf = adapter();
        assert_eq!(lsf.submit_command(Utf8Path::new("job.sh")), "bsub < job.sh");
        assert_eq!(lsf.cancel_command("5"), "bkill 5");
        assert!(lsf.job_query_command("5").ends_with(" 5"));
    }

    #[test]
    fn test_rejects_nodes() {
        let request = ResourceRequest {
            nodes: Some(2),
            qos: Some("high".to_string()),
            ..Default::default()
        };
        match lsf_header_err(&request) {
            AdapterError::UnsupportedResources { scheduler, fields } => {
                assert_eq!(scheduler, "lsf");
                assert_eq!(fields, vec!["nodes".to_string(), "qos".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    fn lsf_header_err(request: &ResourceRequest) -> AdapterError {
        adapter().build_submission_script_header(request).unwrap_err()
    }

    #[test]
    fn test_job_query() {
        let stdout = "5<><>PSUSP<><>bob<><>normal<><>j<><>-<><>1<><>0 second(s)<><>-<><>-<><>-\n";
        let job = adapter().parse_job_output(0, stdout, "").unwrap();
        assert_eq!(job.state, CanonicalState::QueuedHeld);
        assert_eq!(job.info.nodes, None);
        assert_eq!(job.info.memory, None);

        let err = adapter()
            .parse_job_output(255, "", "Job <5> is not found\n")
            .unwrap_err();
        assert!(err.is_command_failure());
    }
}
