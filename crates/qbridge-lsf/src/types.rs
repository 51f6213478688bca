//! LSF job states.

use qbridge_core::{CanonicalState, RawState};

qbridge_core::raw_state_enum! {
    pub enum LsfState {
        /// PEND - Job is pending
        Pending,
        /// WAIT - Job is waiting for its chunk to run
        Waiting,
        /// PSUSP - Job suspended by user while pending
        UserSuspendedPending,
        /// RUN - Job is running
        Running,
        /// USUSP - Job suspended by user while running
        UserSuspended,
        /// SSUSP - Job suspended by system
        SystemSuspended,
        /// DONE - Job completed successfully
        Done,
        /// EXIT - Job exited with non-zero status
        Exit,
        /// ZOMBI - Job killed while its execution host was unreachable
        Zombie,
        /// UNKWN - mbatchd lost contact with the execution host
        Unknown,
    }
}

impl RawState for LsfState {
    const ALL: &'static [Self] = Self::VARIANTS;

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Pending => &["PEND"],
            Self::Waiting => &["WAIT"],
            Self::UserSuspendedPending => &["PSUSP"],
            Self::Running => &["RUN"],
            Self::UserSuspended => &["USUSP"],
            Self::SystemSuspended => &["SSUSP"],
            Self::Done => &["DONE"],
            Self::Exit => &["EXIT"],
            Self::Zombie => &["ZOMBI"],
            Self::Unknown => &["UNKWN"],
        }
    }

    fn canonical_state(self) -> CanonicalState {
        match self {
            Self::Pending | Self::Waiting => CanonicalState::Queued,
            Self::UserSuspendedPending => CanonicalState::QueuedHeld,
            Self::Running => CanonicalState::Running,
            Self::UserSuspended | Self::SystemSuspended => CanonicalState::Suspended,
            Self::Done => CanonicalState::Done,
            Self::Exit | Self::Zombie => CanonicalState::Failed,
            Self::Unknown => CanonicalState::Undetermined,
        }
    }
}
