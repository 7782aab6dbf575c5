//! rubydiff core - structural model building and diffing for Ruby code.
//!
//! This crate turns Ruby source files into logical structure models (a
//! tree of modules, classes, methods, and accessor-style members, each
//! addressable by a signature string) and compares two models to report
//! structural changes independent of formatting, comments, or whitespace.
//!
//! # Features
//!
//! - **Signature-addressable models**: `Foo`, `Foo#bar`, `Foo.bar`,
//!   `Foo {accessor baz}`
//! - **Metaprogramming recognition**: configurable `attr_*`-style
//!   declarative calls synthesize members
//! - **Refactoring-aware diffing**: added/removed/modified declarations
//!   with nested detail, never line-level text diffs
//! - **Parallel parsing**: file sets and version pairs build concurrently
//!   via rayon
//!
//! # Example
//!
//! ```
//! use rubydiff_core::types::SourceFile;
//!
//! let base = SourceFile::new("foo.rb".into(), "class Foo\nend\n".into());
//! let head = SourceFile::new("foo.rb".into(), "class Foo\n  def bar\n  end\nend\n".into());
//!
//! let result = rubydiff_core::diff_sources(&base, &head).unwrap();
//! assert!(result.has_changes());
//! assert_eq!(result.summary.added, 1);
//! ```

pub mod differ;
pub mod error;
pub mod exporter;
pub mod model;
pub mod parser;
pub mod scanner;
pub mod types;

pub use differ::{structure_diff, Change, ChangeKind, ChangeSet, DiffSummary, StructureDiffResult};
pub use error::{Result, StructureError};
pub use model::StructureModel;
pub use parser::{parse_source, HandlerConfig};

use types::SourceFile;

/// Build both versions' models concurrently and diff head against base.
pub fn diff_sources(base: &SourceFile, head: &SourceFile) -> Result<StructureDiffResult> {
    let (base_model, head_model) = parser::parse_pair(base, head);
    Ok(structure_diff(&base_model?, &head_model?))
}
