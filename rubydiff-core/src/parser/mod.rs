//! Ruby AST parsing module.
//!
//! Converts Ruby source into `StructureModel`s using the tree-sitter-ruby
//! grammar. Single files parse synchronously; file sets parse in parallel
//! across a rayon pool, and version pairs build concurrently with disjoint
//! builder state.

use rayon::prelude::*;

use crate::error::Result;
use crate::model::StructureModel;
use crate::types::SourceFile;

pub mod handlers;
mod helpers;
pub mod ruby;

pub use handlers::HandlerConfig;

/// Parse one Ruby source into a structure model.
pub fn parse_source(source: &str, name: &str) -> Result<StructureModel> {
    ruby::parse(source, name)
}

/// Build the base and head models concurrently.
///
/// Each side owns its builder state, so the two walks need no
/// coordination.
pub fn parse_pair(
    base: &SourceFile,
    head: &SourceFile,
) -> (Result<StructureModel>, Result<StructureModel>) {
    rayon::join(
        || parse_source(&base.source, &base.path),
        || parse_source(&head.source, &head.path),
    )
}

/// Parse multiple files in parallel using rayon.
///
/// Results come back in input order. The thread count defaults to the
/// pool's configuration; pass `num_threads` to override it.
pub fn parse_files_parallel(
    files: &[SourceFile],
    num_threads: Option<usize>,
) -> Vec<Result<StructureModel>> {
    let pool = match num_threads {
        Some(n) if n > 0 => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .ok(),
        _ => None,
    };

    let parse_fn = |file: &SourceFile| parse_source(&file.source, &file.path);

    match pool {
        Some(pool) => pool.install(|| files.par_iter().map(parse_fn).collect()),
        None => files.par_iter().map(parse_fn).collect(),
    }
}
