//! bsub directive header rendering.

use qbridge_core::{ResourceField, ResourceRequest, ResourceValue};
use qbridge_parsers::{HeaderTemplate, format_duration_lsf};
use std::collections::{BTreeMap, BTreeSet};

pub const HEADER_TEMPLATE: HeaderTemplate = HeaderTemplate::new(
    r#"
#BSUB -q $${queue}
#BSUB -J $${job_name}
#BSUB -n $${slots}
#BSUB -R "span[ptile=$${ptile}]"
#BSUB -R "select[$${select}]"
#BSUB -M $${memlimit}
#BSUB -W $${walltime}
#BSUB -P $${project}
#BSUB -G $${user_group}
#BSUB -m $${hosts}
#BSUB -gpu "$${gpu}"
#BSUB -u $${mail_user}
#BSUB -sp $${priority}
#BSUB -H$${hold}
#BSUB -o $${output}
#BSUB -e $${error}
"#,
);

/// `ResourceRequest` field -> bsub template placeholder.
pub const DIRECTIVES: &[(ResourceField, &str)] = &[
    (ResourceField::QueueName, "queue"),
    (ResourceField::JobName, "job_name"),
    (ResourceField::Processes, "slots"),
    (ResourceField::ProcessesPerNode, "ptile"),
    (ResourceField::MemoryPerThread, "memlimit"),
    (ResourceField::TimeLimit, "walltime"),
    (ResourceField::Account, "project"),
    (ResourceField::Priority, "priority"),
    (ResourceField::Hold, "hold"),
    (ResourceField::OutputFilepath, "output"),
    (ResourceField::ErrorFilepath, "error"),
];

pub fn supported_fields() -> BTreeSet<ResourceField> {
    DIRECTIVES.iter().map(|(field, _)| *field).collect()
}

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
        ResourceValue::MemoryMib(mb) => format!("{}MB", mb),
        ResourceValue::Seconds(secs) => format_duration_lsf(secs),
        ResourceValue::Path(path) => path.into_string(),
        ResourceValue::Flag => String::new(),
    }
}

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
