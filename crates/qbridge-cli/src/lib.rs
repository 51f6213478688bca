//! CLI argument parsing for qbridge.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "qbridge")]
#[command(about = "Submit, cancel and query batch jobs through one canonical interface")]
pub struct Args {
    /// Batch scheduler to talk to
    #[arg(long, value_enum, default_value = "slurm")]
    pub scheduler: Scheduler,

    /// Adapter configuration file (JSON)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Column separator for list queries
    #[arg(long)]
    pub separator: Option<String>,

    /// SLURM single-job query executable
    #[arg(long, value_enum)]
    pub query_executable: Option<QueryExecutable>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scheduler {
    Slurm,
    Lsf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryExecutable {
    Scontrol,
    Sacct,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the submission script header for a resource request
    Header {
        /// Resource request (JSON); an empty request if omitted
        #[arg(long)]
        resources: Option<Utf8PathBuf>,
    },
    /// Print the scheduler command line for an operation
    Command {
        #[command(subcommand)]
        operation: Operation,
    },
    /// Parse previously captured scheduler output
    Parse {
        #[arg(value_enum)]
        kind: OutputKind,

        /// Exit code of the scheduler command
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        exit_code: i32,

        /// File holding the captured stdout
        #[arg(long)]
        stdout: Option<Utf8PathBuf>,

        /// File holding the captured stderr
        #[arg(long)]
        stderr: Option<Utf8PathBuf>,
    },
    /// Run the scheduler command and parse its output
    Run {
        #[command(subcommand)]
        operation: Operation,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum Operation {
    /// Submit a job script
    Submit { script: Utf8PathBuf },
    /// Cancel a job
    Cancel { job_id: String },
    /// Query one job
    Job { job_id: String },
    /// List jobs, optionally filtered by id or user
    Jobs {
        /// Job id to include (repeatable)
        #[arg(long = "job")]
        job_ids: Vec<String>,

        /// Only jobs owned by this user
        #[arg(long)]
        user: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    Submit,
    Cancel,
    Job,
    Jobs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_jobs_command() {
        let args = Args::parse_from([
            "qbridge", "--scheduler", "lsf", "command", "jobs", "--job", "1", "--job", "2",
        ]);
        assert_eq!(args.scheduler, Scheduler::Lsf);
        match args.command {
            Command::Command {
                operation: Operation::Jobs { job_ids, user },
            } => {
                assert_eq!(job_ids, vec!["1".to_string(), "2".to_string()]);
                assert!(user.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_output_command() {
        let args = Args::parse_from([
            "qbridge",
            "--query-executable",
            "sacct",
            "parse",
            "job",
            "--exit-code",
            "1",
            "--stderr",
            "err.txt",
        ]);
        assert_eq!(args.scheduler, Scheduler::Slurm);
        assert_eq!(args.query_executable, Some(QueryExecutable::Sacct));
        match args.command {
            Command::Parse {
                kind,
                exit_code,
                stdout,
                stderr,
            } => {
                assert_eq!(kind, OutputKind::Job);
                assert_eq!(exit_code, 1);
                assert!(stdout.is_none());
                assert_eq!(stderr.as_deref().map(|p| p.as_str()), Some("err.txt"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
