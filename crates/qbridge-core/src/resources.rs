//! Scheduler-agnostic resource requests.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One dimension of a [`ResourceRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceField {
    QueueName,
    JobName,
    MemoryPerThread,
    Nodes,
    Processes,
    ProcessesPerNode,
    ThreadsPerProcess,
    TimeLimit,
    Account,
    Qos,
    Priority,
    OutputFilepath,
    ErrorFilepath,
    Hold,
}

impl ResourceField {
    pub const ALL: &'static [ResourceField] = &[
        Self::QueueName,
        Self::JobName,
        Self::MemoryPerThread,
        Self::Nodes,
        Self::Processes,
        Self::ProcessesPerNode,
        Self::ThreadsPerProcess,
        Self::TimeLimit,
        Self::Account,
        Self::Qos,
        Self::Priority,
        Self::OutputFilepath,
        Self::ErrorFilepath,
        Self::Hold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::QueueName => "queue_name",
            Self::JobName => "job_name",
            Self::MemoryPerThread => "memory_per_thread",
            Self::Nodes => "nodes",
            Self::Processes => "processes",
            Self::ProcessesPerNode => "processes_per_node",
            Self::ThreadsPerProcess => "threads_per_process",
            Self::TimeLimit => "time_limit",
            Self::Account => "account",
            Self::Qos => "qos",
            Self::Priority => "priority",
            Self::OutputFilepath => "output_filepath",
            Self::ErrorFilepath => "error_filepath",
            Self::Hold => "hold",
        }
    }
}

impl fmt::Display for ResourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A present value of one resource field, tagged with its unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceValue {
    Text(String),
    Count(u32),
    Integer(i64),
    /// Memory in MiB.
    MemoryMib(u64),
    /// Wall time in seconds.
    Seconds(u64),
    Path(Utf8PathBuf),
    Flag,
}

/// What a job asks for, independent of any scheduler.
///
/// Every field is optional; unset fields never produce a directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRequest {
    /// Queue or partition name
    pub queue_name: Option<String>,
    pub job_name: Option<String>,
    /// Memory per thread (MiB)
    pub memory_per_thread: Option<u64>,
    pub nodes: Option<u32>,
    pub processes: Option<u32>,
    pub processes_per_node: Option<u32>,
    pub threads_per_process: Option<u32>,
    /// Wall-time limit (seconds)
    pub time_limit: Option<u64>,
    pub account: Option<String>,
    pub qos: Option<String>,
    pub priority: Option<i64>,
    pub output_filepath: Option<Utf8PathBuf>,
    pub error_filepath: Option<Utf8PathBuf>,
    pub hold: Option<bool>,

    /// Scheduler-specific directive values keyed by template placeholder
    /// (e.g. `gres`, `constraint`).
    pub extras: BTreeMap<String, String>,

    /// Text appended verbatim after the directives.
    pub verbatim: Option<String>,
}

impl ResourceRequest {
    /// The value of `field`, or `None` when it is unset.
    ///
    /// `hold: Some(false)` and blank text or paths count as unset.
    pub fn value(&self, field: ResourceField) -> Option<ResourceValue> {
        match field {
            ResourceField::QueueName => text(&self.queue_name),
            ResourceField::JobName => text(&self.job_name),
            ResourceField::MemoryPerThread => self.memory_per_thread.map(ResourceValue::MemoryMib),
            ResourceField::Nodes => self.nodes.map(ResourceValue::Count),
            ResourceField::Processes => self.processes.map(ResourceValue::Count),
            ResourceField::ProcessesPerNode => self.processes_per_node.map(ResourceValue::Count),
            ResourceField::ThreadsPerProcess => self.threads_per_process.map(ResourceValue::Count),
            ResourceField::TimeLimit => self.time_limit.map(ResourceValue::Seconds),
            ResourceField::Account => text(&self.account),
            ResourceField::Qos => text(&self.qos),
            ResourceField::Priority => self.priority.map(ResourceValue::Integer),
            ResourceField::OutputFilepath => path(&self.output_filepath),
            ResourceField::ErrorFilepath => path(&self.error_filepath),
            ResourceField::Hold => self.hold.filter(|h| *h).map(|_| ResourceValue::Flag),
        }
    }

    /// Extras with a non-blank value.
    pub fn present_extras(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extras
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fields with a present value, in declaration order.
    pub fn set_fields(&self) -> Vec<ResourceField> {
        ResourceField::ALL
            .iter()
            .copied()
            .filter(|f| self.value(*f).is_some())
            .collect()
    }
}

fn text(value: &Option<String>) -> Option<ResourceValue> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(|v| ResourceValue::Text(v.to_string()))
}

fn path(value: &Option<Utf8PathBuf>) -> Option<ResourceValue> {
    value
        .as_ref()
        .filter(|p| !p.as_str().trim().is_empty())
        .map(|p| ResourceValue::Path(p.clone()))
}
