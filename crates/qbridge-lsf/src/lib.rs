//! LSF adapter for qbridge.
//!
//! Builds bsub/bkill/bjobs command lines and parses their output into
//! canonical records.

pub mod adapter;
pub mod bjobs;
pub mod bsub;
pub mod header;
pub mod types;

pub use adapter::{LsfAdapter, LsfConfig};
pub use types::LsfState;
