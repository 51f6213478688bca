//! qbridge - submit, cancel and query batch jobs on SLURM or LSF.

mod config;
mod registry;
mod runner;

use camino::Utf8Path;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use qbridge_cli::{Args, Command, Operation, OutputKind};
use qbridge_core::{ResourceRequest, SchedulerAdapter};
use runner::{CapturedOutput, run_captured};
use serde::Serialize;
use std::fs;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries JSON only; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::resolve_config(&args).into_diagnostic()?;
    let adapter = registry::build_adapter(args.scheduler.into(), &config).into_diagnostic()?;
    let adapter = adapter.as_ref();

    let output = match args.command {
        Command::Header { resources } => render_header(adapter, resources.as_deref())?,
        Command::Command { operation } => build_command(adapter, &operation)?,
        Command::Parse {
            kind,
            exit_code,
            stdout,
            stderr,
        } => {
            let captured = CapturedOutput {
                exit_code,
                stdout: read_optional(stdout.as_deref())?,
                stderr: read_optional(stderr.as_deref())?,
            };
            parse_captured(adapter, kind, &captured)?
        }
        Command::Run { operation } => {
            let command_line = build_command(adapter, &operation)?;
            let captured = run_captured(&command_line).await.into_diagnostic()?;
            parse_captured(adapter, output_kind(&operation), &captured)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn read_optional(path: Option<&Utf8Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).into_diagnostic(),
        None => Ok(String::new()),
    }
}

fn render_header(adapter: &dyn SchedulerAdapter, resources: Option<&Utf8Path>) -> Result<String> {
    let request: ResourceRequest = match resources {
        Some(path) => serde_json::from_str(&read_optional(Some(path))?).into_diagnostic()?,
        None => ResourceRequest::default(),
    };
    adapter
        .build_submission_script_header(&request)
        .into_diagnostic()
}

fn build_command(adapter: &dyn SchedulerAdapter, operation: &Operation) -> Result<String> {
    Ok(match operation {
        Operation::Submit { script } => adapter.submit_command(script),
        Operation::Cancel { job_id } => adapter.cancel_command(job_id),
        Operation::Job { job_id } => adapter.job_query_command(job_id),
        Operation::Jobs { job_ids, user } => adapter
            .jobs_list_command(Some(job_ids.as_slice()), user.as_deref())
            .into_diagnostic()?,
    })
}

fn output_kind(operation: &Operation) -> OutputKind {
    match operation {
        Operation::Submit { .. } => OutputKind::Submit,
        Operation::Cancel { .. } => OutputKind::Cancel,
        Operation::Job { .. } => OutputKind::Job,
        Operation::Jobs { .. } => OutputKind::Jobs,
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).into_diagnostic()
}

fn parse_captured(
    adapter: &dyn SchedulerAdapter,
    kind: OutputKind,
    captured: &CapturedOutput,
) -> Result<String> {
    let CapturedOutput {
        exit_code,
        stdout,
        stderr,
    } = captured;
    match kind {
        OutputKind::Submit => to_json(&adapter.parse_submit_output(*exit_code, stdout, stderr)),
        OutputKind::Cancel => to_json(&adapter.parse_cancel_output(*exit_code, stdout, stderr)),
        OutputKind::Job => {
            let job = adapter
                .parse_job_output(*exit_code, stdout, stderr)
                .into_diagnostic()?;
            to_json(&job)
        }
        OutputKind::Jobs => {
            let jobs = adapter
                .parse_jobs_list_output(*exit_code, stdout, stderr)
                .into_diagnostic()?;
            to_json(&jobs)
        }
    }
}
