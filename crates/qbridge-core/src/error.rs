//! Error taxonomy shared by all adapters.

use thiserror::Error;

/// Captured scheduler text did not match the expected grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParsingError {
    message: String,
}

impl ParsingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The scheduler command reported a non-zero exit for a query whose
    /// result is required.
    #[error("command {command} failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },
    #[error("failed to parse scheduler output: {0}")]
    Parsing(#[from] ParsingError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{scheduler} does not support resource fields: {}", fields.join(", "))]
    UnsupportedResources {
        scheduler: &'static str,
        fields: Vec<String>,
    },
    #[error("invalid raw state table: {0}")]
    InvalidStateTable(String),
}

impl AdapterError {
    pub fn parsing(message: impl Into<String>) -> Self {
        Self::Parsing(ParsingError::new(message))
    }

    /// Whether the scheduler itself rejected the command.
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}
