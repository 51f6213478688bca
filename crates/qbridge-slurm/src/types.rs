//! SLURM job states.
//!
//! Long names and compact codes from the squeue manual ("JOB STATE CODES").

use qbridge_core::{CanonicalState, RawState};

qbridge_core::raw_state_enum! {
    pub enum SlurmState {
        /// BF - terminated due to launch failure
        BootFail,
        /// CA - explicitly cancelled by the user or administrator
        Cancelled,
        /// CD - all processes terminated with exit code zero
        Completed,
        /// CF - allocated, waiting for resources to become ready
        Configuring,
        /// CG - in the process of completing
        Completing,
        /// DL - terminated on deadline
        Deadline,
        /// F - non-zero exit code or other failure
        Failed,
        /// NF - one or more allocated nodes failed
        NodeFail,
        /// OOM - out of memory
        OutOfMemory,
        /// PD - awaiting resource allocation
        Pending,
        /// PR - terminated due to preemption
        Preempted,
        /// R - has an allocation
        Running,
        /// RD - held after its reservation was deleted
        ResvDelHold,
        /// RF - requeued by a federation
        RequeueFed,
        /// RH - held job being requeued
        RequeueHold,
        /// RQ - completing job being requeued
        Requeued,
        /// RS - about to change size
        Resizing,
        /// RV - sibling removed because another cluster started the job
        Revoked,
        /// SI - being signaled
        Signaling,
        /// SE - requeued in a special state
        SpecialExit,
        /// SO - staging out files
        StageOut,
        /// ST - stopped with SIGSTOP, cpus retained
        Stopped,
        /// S - suspended, cpus released
        Suspended,
        /// TO - reached its time limit
        Timeout,
    }
}

impl RawState for SlurmState {
    const ALL: &'static [Self] = Self::VARIANTS;

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::BootFail => &["BOOT_FAIL", "BF"],
            Self::Cancelled => &["CANCELLED", "CA"],
            Self::Completed => &["COMPLETED", "CD"],
            Self::Configuring => &["CONFIGURING", "CF"],
            Self::Completing => &["COMPLETING", "CG"],
            Self::Deadline => &["DEADLINE", "DL"],
            Self::Failed => &["FAILED", "F"],
            Self::NodeFail => &["NODE_FAIL", "NF"],
            Self::OutOfMemory => &["OUT_OF_MEMORY", "OOM"],
            Self::Pending => &["PENDING", "PD"],
            Self::Preempted => &["PREEMPTED", "PR"],
            Self::Running => &["RUNNING", "R"],
            Self::ResvDelHold => &["RESV_DEL_HOLD", "RD"],
            Self::RequeueFed => &["REQUEUE_FED", "RF"],
            Self::RequeueHold => &["REQUEUE_HOLD", "RH"],
            Self::Requeued => &["REQUEUED", "RQ"],
            Self::Resizing => &["RESIZING", "RS"],
            Self::Revoked => &["REVOKED", "RV"],
            Self::Signaling => &["SIGNALING", "SI"],
            Self::SpecialExit => &["SPECIAL_EXIT", "SE"],
            Self::StageOut => &["STAGE_OUT", "SO"],
            Self::Stopped => &["STOPPED", "ST"],
            Self::Suspended => &["SUSPENDED", "S"],
            Self::Timeout => &["TIMEOUT", "TO"],
        }
    }

    fn canonical_state(self) -> CanonicalState {
        match self {
            // Inherited convention: a cancelled job that has not been reaped
            // is reported as suspended, not failed.
            Self::Cancelled => CanonicalState::Suspended,
            Self::Completing => CanonicalState::Running,
            Self::Completed => CanonicalState::Done,
            Self::Configuring => CanonicalState::Queued,
            Self::Pending => CanonicalState::Queued,
            Self::ResvDelHold => CanonicalState::QueuedHeld,
            Self::Running | Self::Resizing | Self::Signaling | Self::StageOut => {
                CanonicalState::Running
            }
            Self::Suspended | Self::Stopped => CanonicalState::Suspended,
            Self::Requeued | Self::RequeueFed => CanonicalState::Requeued,
            Self::RequeueHold | Self::SpecialExit => CanonicalState::RequeuedHeld,
            Self::BootFail
            | Self::Deadline
            | Self::Failed
            | Self::NodeFail
            | Self::OutOfMemory
            | Self::Preempted
            | Self::Timeout => CanonicalState::Failed,
            Self::Revoked => CanonicalState::Undetermined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use qbridge_core::StateTable;

    #[test]
    fn test_every_declared_variant_is_in_table() {
        let table = StateTable::<SlurmState>::new().unwrap();
        assert_eq!(SlurmState::ALL, SlurmState::VARIANTS);
        assert_eq!(SlurmState::VARIANTS.len(), 24);
        for state in SlurmState::VARIANTS {
            assert_eq!(table.lookup(state.name()).unwrap(), *state);
        }
    }

    #[test]
    fn test_state_table_builds() {
        let table = StateTable::<SlurmState>::new().unwrap();
        assert_eq!(table.len(), 48);
    }

    #[test]
    fn test_core_mappings() {
        assert_eq!(SlurmState::Cancelled.canonical_state(), CanonicalState::Suspended);
        assert_eq!(SlurmState::Completing.canonical_state(), CanonicalState::Running);
        assert_eq!(SlurmState::Completed.canonical_state(), CanonicalState::Done);
        assert_eq!(SlurmState::Pending.canonical_state(), CanonicalState::Queued);
        for state in [
            SlurmState::OutOfMemory,
            SlurmState::NodeFail,
            SlurmState::Deadline,
            SlurmState::Timeout,
        ] {
            assert_eq!(state.canonical_state(), CanonicalState::Failed);
        }
    }

    #[test]
    fn test_short_and_long_codes_agree() {
        let table = StateTable::<SlurmState>::new().unwrap();
        assert_eq!(table.lookup("CD").unwrap(), SlurmState::Completed);
        assert_eq!(table.lookup("COMPLETED").unwrap(), SlurmState::Completed);
        assert_eq!(table.lookup("OOM").unwrap(), SlurmState::OutOfMemory);
        assert!(table.lookup("BOGUS").is_err());
    }

    proptest! {
        #[test]
        fn prop_every_alias_resolves_to_its_variant(idx in 0..SlurmState::ALL.len()) {
            let table = StateTable::<SlurmState>::new().unwrap();
            let state = SlurmState::ALL[idx];
            for alias in state.aliases() {
                prop_assert_eq!(table.lookup(alias).unwrap(), state);
                prop_assert_eq!(table.canonical(alias).unwrap(), state.canonical_state());
            }
        }

        #[test]
        fn prop_lowercase_literals_are_unknown(literal in "[a-z_]{1,14}") {
            let table = StateTable::<SlurmState>::new().unwrap();
            prop_assert!(table.lookup(&literal).is_err());
        }
    }
}
