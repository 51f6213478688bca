//! Canonical job model and the scheduler adapter contract for qbridge.
//!
//! Every scheduler adapter translates between the types in this crate and
//! the text its scheduler's command-line tools consume and produce.

pub mod adapter;
pub mod error;
pub mod resources;
pub mod state;
pub mod types;

pub use adapter::SchedulerAdapter;
pub use error::{AdapterError, ParsingError};
pub use resources::{ResourceField, ResourceRequest, ResourceValue};
pub use state::{CanonicalState, RawState, StateTable};
pub use types::{
    AllocatedResourceInfo, CancelStatus, CancellationOutcome, JobRecord, SubmissionOutcome,
    SubmissionStatus,
};
