//! Adapter configuration loading.

use crate::registry::AdapterConfig;
use camino::Utf8Path;
use qbridge_cli::{Args, QueryExecutable};
use qbridge_slurm::JobQueryExecutable;
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Load configuration from a JSON file. Missing sections take defaults.
pub fn load_config(path: &Utf8Path) -> Result<AdapterConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_string(),
        source,
    })
}

/// Build the effective configuration: file (if any), then CLI overrides.
pub fn resolve_config(args: &Args) -> Result<AdapterConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AdapterConfig::default(),
    };

    if let Some(separator) = &args.separator {
        config.slurm.split_separator = separator.clone();
        config.lsf.split_separator = separator.clone();
    }
    if let Some(executable) = args.query_executable {
        config.slurm.job_query_executable = match executable {
            QueryExecutable::Scontrol => JobQueryExecutable::Scontrol,
            QueryExecutable::Sacct => JobQueryExecutable::Sacct,
        };
    }

    tracing::debug!("Resolved adapter config: {:?}", config);
    Ok(config)
}
