//! sbatch directive header rendering.

use qbridge_core::{ResourceField, ResourceRequest, ResourceValue};
use qbridge_parsers::{HeaderTemplate, format_duration_slurm};
use std::collections::{BTreeMap, BTreeSet};

pub const HEADER_TEMPLATE: HeaderTemplate = HeaderTemplate::new(
    "
#SBATCH --partition=$${partition}
#SBATCH --job-name=$${job-name}
#SBATCH --nodes=$${nodes}
#SBATCH --ntasks=$${ntasks}
#SBATCH --ntasks-per-node=$${ntasks-per-node}
#SBATCH --cpus-per-task=$${cpus-per-task}
#SBATCH --mem=$${mem}
#SBATCH --mem-per-cpu=$${mem-per-cpu}
#SBATCH --hint=$${hint}
#SBATCH --time=$${time}
#SBATCH --exclude=$${exclude}
#SBATCH --account=$${account}
#SBATCH --mail-user=$${mail-user}
#SBATCH --mail-type=$${mail-type}
#SBATCH --constraint=$${constraint}
#SBATCH --gres=$${gres}
#SBATCH --nodelist=$${nodelist}
#SBATCH --propagate=$${propagate}
#SBATCH --licenses=$${licenses}
#SBATCH --priority=$${priority}
#SBATCH --hold$${hold}
#SBATCH --output=$${output}
#SBATCH --error=$${error}
#SBATCH --qos=$${qos}
",
);

/// `ResourceRequest` field -> sbatch directive key (and template placeholder).
pub const DIRECTIVES: &[(ResourceField, &str)] = &[
    (ResourceField::QueueName, "partition"),
    (ResourceField::JobName, "job-name"),
    (ResourceField::MemoryPerThread, "mem-per-cpu"),
    (ResourceField::Nodes, "nodes"),
    (ResourceField::Processes, "ntasks"),
    (ResourceField::ProcessesPerNode, "ntasks-per-node"),
    (ResourceField::ThreadsPerProcess, "cpus-per-task"),
    (ResourceField::TimeLimit, "time"),
    (ResourceField::Account, "account"),
    (ResourceField::Qos, "qos"),
    (ResourceField::Priority, "priority"),
    (ResourceField::OutputFilepath, "output"),
    (ResourceField::ErrorFilepath, "error"),
    (ResourceField::Hold, "hold"),
];

pub fn supported_fields() -> BTreeSet<ResourceField> {
    DIRECTIVES.iter().map(|(field, _)| *field).collect()
}

/// Template placeholders not backed by a `ResourceRequest` field.
pub fn supported_extras() -> BTreeSet<&'static str> {
    let mapped: BTreeSet<&str> = DIRECTIVES.iter().map(|(_, key)| *key).collect();
    HEADER_TEMPLATE
        .placeholders()
        .into_iter()
        .filter(|p| !mapped.contains(p))
        .collect()
}

fn format_value(value: ResourceValue) -> String {
    match value {
        ResourceValue::Text(s) => s,
        ResourceValue::Count(n) => n.to_string(),
        ResourceValue::Integer(n) => n.to_string(),
        ResourceValue::MemoryMib(mb) => format!("{}M", mb),
        ResourceValue::Seconds(secs) => format_duration_slurm(secs),
        ResourceValue::Path(path) => path.into_string(),
        ResourceValue::Flag => String::new(),
    }
}

/// Render the `#SBATCH` block. Callers validate `resources` first.
pub fn render_header(resources: &ResourceRequest) -> String {
    let mut values: BTreeMap<&str, String> = resources
        .present_extras()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
    for (field, key) in DIRECTIVES {
        if let Some(value) = resources.value(*field) {
            values.insert(*key, format_value(value));
        }
    }

    let mut header = HEADER_TEMPLATE.render(&values);
    if let Some(verbatim) = resources.verbatim.as_deref().filter(|v| !v.is_empty()) {
        if !header.is_empty() {
            header.push('\n');
        }
        header.push_str(verbatim);
    }
    header
}
