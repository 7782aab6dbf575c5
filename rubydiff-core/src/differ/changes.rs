//! Change types and result structures for structural diff.

use serde::{Deserialize, Serialize};

/// Classification of one signature in a diff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
    Unchanged,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
            ChangeKind::Unchanged => "unchanged",
        }
    }
}

/// One change-set entry for a signature.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Change {
    /// The signature this entry classifies.
    pub signature: String,

    /// How the declaration changed between base and head.
    pub change_type: ChangeKind,

    /// Nested change set over the children of a matched pair.
    /// Empty unless the entry is Modified.
    pub children: ChangeSet,
}

impl Change {
    pub fn new(signature: impl Into<String>, change_type: ChangeKind) -> Self {
        Self {
            signature: signature.into(),
            change_type,
            children: ChangeSet::default(),
        }
    }

    /// Attach the nested change set for a Modified pair.
    pub fn with_children(mut self, children: ChangeSet) -> Self {
        self.children = children;
        self
    }
}

/// An ordered set of changes: base signatures in declaration order first,
/// then head-only signatures in their declaration order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub entries: Vec<Change>,
}

impl ChangeSet {
    pub fn push(&mut self, change: Change) {
        self.entries.push(change);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every entry at every depth is Unchanged.
    pub fn all_unchanged(&self) -> bool {
        self.entries
            .iter()
            .all(|c| c.change_type == ChangeKind::Unchanged && c.children.all_unchanged())
    }

    /// Fold every entry at every depth into the summary counters.
    pub fn record_into(&self, summary: &mut DiffSummary) {
        for change in &self.entries {
            summary.record(change.change_type);
            change.children.record_into(summary);
        }
    }

    /// Look up a top-level entry by signature.
    pub fn find(&self, signature: &str) -> Option<&Change> {
        self.entries.iter().find(|c| c.signature == signature)
    }
}

/// Summary statistics for a diff, counted across all nesting levels.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: u32,
    pub removed: u32,
    pub modified: u32,
    pub unchanged: u32,
}

impl DiffSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for one classification.
    pub fn record(&mut self, change_type: ChangeKind) {
        match change_type {
            ChangeKind::Added => self.added += 1,
            ChangeKind::Removed => self.removed += 1,
            ChangeKind::Modified => self.modified += 1,
            ChangeKind::Unchanged => self.unchanged += 1,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0 || self.modified > 0
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();

        if self.added > 0 {
            parts.push(format!("{} added", self.added));
        }
        if self.removed > 0 {
            parts.push(format!("{} removed", self.removed));
        }
        if self.modified > 0 {
            parts.push(format!("{} modified", self.modified));
        }

        if parts.is_empty() {
            "No structural changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Complete result of a structural diff operation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StructureDiffResult {
    /// The nested change set over the root registries.
    pub changes: ChangeSet,

    /// Summary statistics.
    pub summary: DiffSummary,

    /// Human-readable summary text.
    pub summary_text: String,

    /// Duration of the diff operation in milliseconds.
    pub duration_ms: f64,
}

impl StructureDiffResult {
    pub fn new(changes: ChangeSet) -> Self {
        let mut summary = DiffSummary::new();
        changes.record_into(&mut summary);
        Self {
            changes,
            summary,
            summary_text: String::new(),
            duration_ms: 0.0,
        }
    }

    /// Finalize the result with timing and summary text.
    pub fn finalize(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms;
        self.summary_text = self.summary.text();
    }

    pub fn has_changes(&self) -> bool {
        self.summary.has_changes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_kind_as_str() {
        assert_eq!(ChangeKind::Added.as_str(), "added");
        assert_eq!(ChangeKind::Removed.as_str(), "removed");
        assert_eq!(ChangeKind::Modified.as_str(), "modified");
        assert_eq!(ChangeKind::Unchanged.as_str(), "unchanged");
    }

    #[test]
    fn test_all_unchanged_recurses() {
        let mut set = ChangeSet::default();
        set.push(Change::new("Foo", ChangeKind::Unchanged));
        assert!(set.all_unchanged());

        let mut nested = ChangeSet::default();
        nested.push(Change::new("Foo#bar", ChangeKind::Added));
        let mut set = ChangeSet::default();
        set.push(Change::new("Foo", ChangeKind::Modified).with_children(nested));
        assert!(!set.all_unchanged());
    }

    #[test]
    fn test_summary_record_and_text() {
        let mut summary = DiffSummary::new();
        summary.record(ChangeKind::Added);
        summary.record(ChangeKind::Added);
        summary.record(ChangeKind::Removed);
        summary.record(ChangeKind::Unchanged);

        assert!(summary.has_changes());
        let text = summary.text();
        assert!(text.contains("2 added"));
        assert!(text.contains("1 removed"));
        assert!(!text.contains("modified"));
    }

    #[test]
    fn test_summary_text_no_changes() {
        let mut summary = DiffSummary::new();
        summary.record(ChangeKind::Unchanged);
        assert!(!summary.has_changes());
        assert_eq!(summary.text(), "No structural changes");
    }

    #[test]
    fn test_result_counts_nested_entries() {
        let mut nested = ChangeSet::default();
        nested.push(Change::new("Foo#bar", ChangeKind::Unchanged));
        nested.push(Change::new("Foo {accessor baz}", ChangeKind::Added));

        let mut set = ChangeSet::default();
        set.push(Change::new("Foo", ChangeKind::Modified).with_children(nested));

        let mut result = StructureDiffResult::new(set);
        result.finalize(1.5);

        assert_eq!(result.summary.modified, 1);
        assert_eq!(result.summary.added, 1);
        assert_eq!(result.summary.unchanged, 1);
        assert_eq!(result.duration_ms, 1.5);
        assert!(!result.summary_text.is_empty());
    }
}
