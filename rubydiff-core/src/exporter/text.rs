//! Plain-text format exporter.
//!
//! Renders a change set as an indented report, one declaration per line.
//! Unchanged entries are filtered out unless the config asks for them.

use crate::differ::{ChangeKind, ChangeSet, StructureDiffResult};
use crate::types::ExportConfig;

const SIGIL_ADDED: &str = "+";
const SIGIL_REMOVED: &str = "-";
const SIGIL_MODIFIED: &str = "~";
const SIGIL_UNCHANGED: &str = "=";

fn sigil(change_type: ChangeKind) -> &'static str {
    match change_type {
        ChangeKind::Added => SIGIL_ADDED,
        ChangeKind::Removed => SIGIL_REMOVED,
        ChangeKind::Modified => SIGIL_MODIFIED,
        ChangeKind::Unchanged => SIGIL_UNCHANGED,
    }
}

/// Export a diff result to plain text.
pub fn export(result: &StructureDiffResult, config: &ExportConfig) -> String {
    let mut lines = vec![result.summary.text()];
    render_set(&result.changes, 0, config, &mut lines);
    lines.join("\n")
}

fn render_set(set: &ChangeSet, depth: usize, config: &ExportConfig, lines: &mut Vec<String>) {
    for change in set.iter() {
        if change.change_type == ChangeKind::Unchanged && !config.include_unchanged {
            continue;
        }
        let indent = "  ".repeat(depth + 1);
        lines.push(format!(
            "{}{} {}",
            indent,
            sigil(change.change_type),
            change.signature
        ));
        render_set(&change.children, depth + 1, config, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::{Change, ChangeKind};

    fn sample_result() -> StructureDiffResult {
        let mut nested = ChangeSet::default();
        nested.push(Change::new("Foo#bar", ChangeKind::Unchanged));
        nested.push(Change::new("Foo {accessor baz}", ChangeKind::Added));

        let mut set = ChangeSet::default();
        set.push(Change::new("Foo", ChangeKind::Modified).with_children(nested));
        set.push(Change::new("Legacy", ChangeKind::Removed));

        let mut result = StructureDiffResult::new(set);
        result.finalize(0.1);
        result
    }

    #[test]
    fn test_export_filters_unchanged() {
        let output = export(&sample_result(), &ExportConfig::default());
        assert!(output.contains("~ Foo"));
        assert!(output.contains("+ Foo {accessor baz}"));
        assert!(output.contains("- Legacy"));
        assert!(!output.contains("Foo#bar"));
    }

    #[test]
    fn test_export_includes_unchanged_when_asked() {
        let config = ExportConfig {
            include_unchanged: true,
            ..Default::default()
        };
        let output = export(&sample_result(), &config);
        assert!(output.contains("= Foo#bar"));
    }

    #[test]
    fn test_export_indents_nested_entries() {
        let output = export(&sample_result(), &ExportConfig::default());
        assert!(output.contains("\n  ~ Foo"));
        assert!(output.contains("\n    + Foo {accessor baz}"));
    }
}
