//! Comparator logic for diffing structure models.
//!
//! Matching is strictly by exact signature string: a renamed declaration
//! reports as one Removed and one Added entry, never as a Modified pair.
//! The comparison mutates neither model and may run concurrently for
//! independent pairs.

use std::collections::HashMap;
use std::time::Instant;

use crate::differ::changes::{Change, ChangeKind, ChangeSet, StructureDiffResult};
use crate::model::StructureModel;
use crate::types::ObjectId;

/// Compare two models' root registries and classify every signature.
///
/// Base signatures come first, in declaration order; head-only signatures
/// follow in their declaration order. The same ordering applies at every
/// nesting level.
pub fn diff_models(base: &StructureModel, head: &StructureModel) -> ChangeSet {
    diff_level(
        base,
        &base.roots().entries(),
        head,
        &head.roots().entries(),
    )
}

/// Diff one level of matched signature lists.
fn diff_level(
    base: &StructureModel,
    base_entries: &[(String, ObjectId)],
    head: &StructureModel,
    head_entries: &[(String, ObjectId)],
) -> ChangeSet {
    let base_index: HashMap<&str, ObjectId> = base_entries
        .iter()
        .map(|(signature, id)| (signature.as_str(), *id))
        .collect();
    let head_index: HashMap<&str, ObjectId> = head_entries
        .iter()
        .map(|(signature, id)| (signature.as_str(), *id))
        .collect();

    let mut set = ChangeSet::default();

    for (signature, base_id) in base_entries {
        match head_index.get(signature.as_str()) {
            Some(&head_id) => set.push(compare_pair(base, *base_id, head, head_id, signature)),
            None => set.push(Change::new(signature.clone(), ChangeKind::Removed)),
        }
    }

    for (signature, _) in head_entries {
        if !base_index.contains_key(signature.as_str()) {
            set.push(Change::new(signature.clone(), ChangeKind::Added));
        }
    }

    set
}

/// Classify a signature present on both sides.
///
/// Unchanged requires object equality plus recursively unchanged
/// children; anything else is Modified and carries the nested change set
/// over the pair's children.
fn compare_pair(
    base: &StructureModel,
    base_id: ObjectId,
    head: &StructureModel,
    head_id: ObjectId,
    signature: &str,
) -> Change {
    let children = diff_level(
        base,
        &base.child_entries(base_id),
        head,
        &head.child_entries(head_id),
    );

    if base.object_eq(base_id, head, head_id) && children.all_unchanged() {
        Change::new(signature, ChangeKind::Unchanged)
    } else {
        Change::new(signature, ChangeKind::Modified).with_children(children)
    }
}

/// Diff head against base and package the result with summary and timing.
pub fn structure_diff(base: &StructureModel, head: &StructureModel) -> StructureDiffResult {
    let start = Instant::now();
    let changes = diff_models(base, head);
    let mut result = StructureDiffResult::new(changes);
    result.finalize(start.elapsed().as_secs_f64() * 1000.0);
    result
}
