//! SLURM adapter for qbridge.
//!
//! Builds sbatch/scancel/scontrol/squeue/sacct command lines and parses
//! their output into canonical records.

pub mod adapter;
pub mod header;
pub mod sacct;
pub mod sbatch;
pub mod scontrol;
pub mod squeue;
pub mod types;

pub use adapter::{JobQueryExecutable, SlurmAdapter, SlurmConfig};
pub use types::SlurmState;
