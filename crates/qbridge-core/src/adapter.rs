//! The contract every scheduler adapter implements.

use crate::error::AdapterError;
use crate::resources::{ResourceField, ResourceRequest};
use crate::types::{CancellationOutcome, JobRecord, SubmissionOutcome};
use camino::Utf8Path;
use std::collections::BTreeSet;

/// Translation layer between canonical requests/records and one scheduler's
/// command-line tools.
///
/// Implementations hold only immutable configuration. Every method is a pure
/// function of its arguments, so one adapter can be shared across threads.
pub trait SchedulerAdapter: Send + Sync {
    /// Short scheduler name, e.g. `"slurm"`.
    fn scheduler(&self) -> &'static str;

    /// Render the directive block placed at the top of a submission script.
    fn build_submission_script_header(
        &self,
        resources: &ResourceRequest,
    ) -> Result<String, AdapterError>;

    fn submit_command(&self, script_file: &Utf8Path) -> String;

    fn cancel_command(&self, job_id: &str) -> String;

    fn job_query_command(&self, job_id: &str) -> String;

    /// Fails with `InvalidArgument` when both `job_ids` and `user` are given.
    fn jobs_list_command(
        &self,
        job_ids: Option<&[String]>,
        user: Option<&str>,
    ) -> Result<String, AdapterError>;

    fn parse_submit_output(&self, exit_code: i32, stdout: &str, stderr: &str)
    -> SubmissionOutcome;

    fn parse_cancel_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> CancellationOutcome;

    /// Fails with `CommandFailed` when `exit_code != 0`.
    fn parse_job_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Result<JobRecord, AdapterError>;

    /// Fails with `CommandFailed` when `exit_code != 0`. Never returns a
    /// partial list.
    fn parse_jobs_list_output(
        &self,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Result<Vec<JobRecord>, AdapterError>;

    /// The `ResourceRequest` fields this adapter turns into directives.
    fn supported_resource_fields(&self) -> BTreeSet<ResourceField>;

    /// Template placeholders accepted in `ResourceRequest::extras`.
    fn supported_extras(&self) -> BTreeSet<&'static str> {
        BTreeSet::new()
    }

    /// Reject a request that sets anything this adapter would silently drop.
    fn check_resources(&self, resources: &ResourceRequest) -> Result<(), AdapterError> {
        let supported = self.supported_resource_fields();
        let extras = self.supported_extras();

        let mut unsupported: Vec<String> = resources
            .set_fields()
            .into_iter()
            .filter(|f| !supported.contains(f))
            .map(|f| f.to_string())
            .collect();
        unsupported.extend(
            resources
                .extras
                .keys()
                .filter(|k| !extras.contains(k.as_str()))
                .cloned(),
        );

        if unsupported.is_empty() {
            Ok(())
        } else {
            Err(AdapterError::UnsupportedResources {
                scheduler: self.scheduler(),
                fields: unsupported,
            })
        }
    }
}
