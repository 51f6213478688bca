//! All known adapters behind the common adapter interface.

use qbridge_cli::Scheduler;
use qbridge_core::{AdapterError, SchedulerAdapter};
use qbridge_lsf::{LsfAdapter, LsfConfig};
use qbridge_slurm::{SlurmAdapter, SlurmConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerKind {
    Slurm,
    Lsf,
}

impl SchedulerKind {
    pub const ALL: &'static [SchedulerKind] = &[Self::Slurm, Self::Lsf];
}

impl From<Scheduler> for SchedulerKind {
    fn from(scheduler: Scheduler) -> Self {
        match scheduler {
            Scheduler::Slurm => Self::Slurm,
            Scheduler::Lsf => Self::Lsf,
        }
    }
}

/// Per-scheduler configuration, one section per adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub slurm: SlurmConfig,
    pub lsf: LsfConfig,
}

pub fn build_adapter(
    kind: SchedulerKind,
    config: &AdapterConfig,
) -> Result<Box<dyn SchedulerAdapter>, AdapterError> {
    let adapter: Box<dyn SchedulerAdapter> = match kind {
        SchedulerKind::Slurm => Box::new(SlurmAdapter::new(config.slurm.clone())?),
        SchedulerKind::Lsf => Box::new(LsfAdapter::new(config.lsf.clone())?),
    };
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbridge_core::{ResourceField, ResourceRequest};

    #[test]
    fn test_every_adapter_builds() {
        let config = AdapterConfig::default();
        let names: Vec<_> = SchedulerKind::ALL
            .iter()
            .map(|kind| build_adapter(*kind, &config).unwrap().scheduler())
            .collect();
        assert_eq!(names, vec!["slurm", "lsf"]);
    }

    #[test]
    fn test_adapters_advertise_their_own_fields() {
        let config = AdapterConfig::default();
        let slurm = build_adapter(SchedulerKind::Slurm, &config).unwrap();
        let lsf = build_adapter(SchedulerKind::Lsf, &config).unwrap();
        assert!(slurm.supported_resource_fields().contains(&ResourceField::Nodes));
        assert!(!lsf.supported_resource_fields().contains(&ResourceField::Nodes));

        let request = ResourceRequest {
            nodes: Some(4),
            ..Default::default()
        };
        assert!(slurm.check_resources(&request).is_ok());
        assert!(lsf.check_resources(&request).is_err());
    }

    #[test]
    fn test_every_adapter_rejects_user_and_ids() {
        let config = AdapterConfig::default();
        let ids = vec!["1".to_string()];
        for kind in SchedulerKind::ALL {
            let adapter = build_adapter(*kind, &config).unwrap();
            assert!(matches!(
                adapter.jobs_list_command(Some(ids.as_slice()), Some("alice")),
                Err(AdapterError::InvalidArgument(_))
            ));
        }
    }
}
