//! Structural diff engine for comparing structure models.
//!
//! Compares two completed models by declaration signature and classifies
//! every root-level signature as Added, Removed, Modified, or Unchanged,
//! with nested change sets for Modified pairs. Formatting, comment, and
//! whitespace differences never register as changes.

pub mod changes;
pub mod comparator;

pub use changes::{Change, ChangeKind, ChangeSet, DiffSummary, StructureDiffResult};
pub use comparator::{diff_models, structure_diff};
