//! Error types for rubydiff-core.

use thiserror::Error;

/// Result type alias for rubydiff-core operations.
pub type Result<T> = std::result::Result<T, StructureError>;

/// Errors that can occur while building or scanning structure models.
#[derive(Error, Debug)]
pub enum StructureError {
    /// The tree-sitter Ruby grammar could not be loaded.
    #[error("Failed to load Ruby grammar: {message}")]
    Grammar {
        /// Description of the grammar error.
        message: String,
    },

    /// tree-sitter produced no syntax tree for the source.
    #[error("Failed to parse {name}")]
    Parse {
        /// Label of the source that failed to parse.
        name: String,
    },

    /// A recognized declaration node is missing its name, so its
    /// signature is undefined and the build must abort.
    #[error("Malformed {kind} declaration at line {line}: missing name")]
    MalformedNode {
        /// Node kind of the broken declaration.
        kind: String,
        /// 1-indexed source line of the declaration.
        line: u32,
    },

    /// A scan root does not exist on disk.
    #[error("Path does not exist: {path}")]
    MissingPath {
        /// The path that was requested.
        path: String,
    },

    /// IO error reading source files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
