//! Submission-script header templates with `$${name}` placeholders.

use std::collections::{BTreeMap, BTreeSet};

const OPEN: &str = "$${";
const CLOSE: char = '}';

/// A fixed directive template, one directive per line.
///
/// Rendering drops every line with a placeholder that has no value, so unset
/// resources never produce an empty directive.
#[derive(Debug, Clone, Copy)]
pub struct HeaderTemplate {
    text: &'static str,
}

impl HeaderTemplate {
    pub const fn new(text: &'static str) -> Self {
        Self { text }
    }

    /// Names of every placeholder in the template.
    pub fn placeholders(&self) -> BTreeSet<&'static str> {
        self.text.lines().flat_map(line_placeholders).collect()
    }

    pub fn render(&self, values: &BTreeMap<&str, String>) -> String {
        self.text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| render_line(line, values))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn line_placeholders(line: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = line;
    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        match after.find(CLOSE) {
            Some(end) => {
                names.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

fn render_line(line: &str, values: &BTreeMap<&str, String>) -> Option<String> {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(start) = rest.find(OPEN) {
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(CLOSE) else {
            break;
        };
        let value = values.get(&after[..end])?;
        out.push_str(&rest[..start]);
        out.push_str(value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: HeaderTemplate = HeaderTemplate::new(
        "
#SBATCH --partition=$${partition}
#SBATCH --nodes=$${nodes}
#SBATCH --hold$${hold}
#SBATCH --span=$${lo}-$${hi}
",
    );

    #[test]
    fn test_placeholders() {
        let names: Vec<_> = TEMPLATE.placeholders().into_iter().collect();
        assert_eq!(names, vec!["hi", "hold", "lo", "nodes", "partition"]);
    }

    #[test]
    fn test_render_drops_unset_lines() {
        let values = BTreeMap::from([("nodes", "2".to_string())]);
        assert_eq!(TEMPLATE.render(&values), "#SBATCH --nodes=2");
    }

    #[test]
    fn test_render_flag_and_multi_placeholder() {
        let values = BTreeMap::from([
            ("hold", String::new()),
            ("lo", "1".to_string()),
            ("hi", "4".to_string()),
        ]);
        assert_eq!(TEMPLATE.render(&values), "#SBATCH --hold\n#SBATCH --span=1-4");
    }

    #[test]
    fn test_partial_line_is_dropped() {
        let values = BTreeMap::from([("lo", "1".to_string())]);
        assert_eq!(TEMPLATE.render(&values), "");
    }

    #[test]
    fn test_plain_lines_kept() {
        let template = HeaderTemplate::new("#!/bin/bash\n#X --a=$${a}");
        assert_eq!(template.render(&BTreeMap::new()), "#!/bin/bash");
    }
}
