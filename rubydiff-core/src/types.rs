//! Data model for parsed code structure.
//!
//! These types represent the logical structure of a Ruby source file:
//! modules, classes, methods, and declaratively-generated members, each
//! addressable by a derived signature string.

use serde::{Deserialize, Serialize};

/// Index of a Code Object inside its owning `StructureModel` arena.
///
/// Ids are non-owning: the arena owns every object, and parent/child links
/// are plain indices into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(usize);

impl ObjectId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// The declaration variant of a Code Object.
///
/// The variant determines how a signature is composed from the enclosing
/// scope's signature and the object's own name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeKind {
    Module,
    Class,
    Method {
        /// True for `def foo` in instance scope, false for `def self.foo`
        /// and definitions inside a `class << x` block.
        is_instance: bool,
    },
    MetaMember {
        /// Handler label, e.g. "accessor" for `attr_accessor`.
        label: String,
    },
}

impl CodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeKind::Module => "module",
            CodeKind::Class => "class",
            CodeKind::Method { .. } => "method",
            CodeKind::MetaMember { .. } => "meta",
        }
    }

    /// Compose the signature string from the enclosing scope's signature.
    ///
    /// Modules and classes join the chain with `::`; methods use `#` for
    /// instance methods and `.` otherwise; synthesized members render as
    /// `{label name}` after the scope.
    pub fn compose_signature(&self, parent: Option<&str>, name: &str) -> String {
        match self {
            CodeKind::Module | CodeKind::Class => match parent {
                Some(parent) => format!("{}::{}", parent, name),
                None => name.to_string(),
            },
            CodeKind::Method { is_instance } => {
                let sep = if *is_instance { '#' } else { '.' };
                format!("{}{}{}", parent.unwrap_or(""), sep, name)
            }
            CodeKind::MetaMember { label } => {
                format!("{} {{{} {}}}", parent.unwrap_or(""), label, name)
            }
        }
    }
}

/// Structural snapshot of a syntax subtree.
///
/// Captures node kind, leaf token text, and children, with comment nodes
/// dropped. Whitespace never appears in the syntax tree, so snapshot
/// equality compares code structure and token content only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sexp {
    pub kind: String,
    /// Token text, present on leaves only.
    pub text: Option<String>,
    pub children: Vec<Sexp>,
}

impl Sexp {
    pub fn new(kind: String, text: Option<String>, children: Vec<Sexp>) -> Self {
        Self {
            kind,
            text,
            children,
        }
    }
}

/// A declared construct: module, class, method, or synthesized member.
///
/// Objects are immutable after creation, except that the owning model
/// appends child ids as nested declarations register. The body snapshot is
/// fixed at creation and participates only in equality, never in signature
/// derivation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CodeObject {
    pub name: String,
    pub kind: CodeKind,
    /// Non-owning back-reference to the enclosing declaration.
    pub parent: Option<ObjectId>,
    /// Owned children in declaration order.
    pub children: Vec<ObjectId>,
    pub body: Sexp,
}

impl CodeObject {
    pub fn new(name: String, kind: CodeKind, parent: Option<ObjectId>, body: Sexp) -> Self {
        Self {
            name,
            kind,
            parent,
            children: Vec::new(),
            body,
        }
    }
}

/// A source file handed to the parser.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub source: String,
}

impl SourceFile {
    pub fn new(path: String, source: String) -> Self {
        Self { path, source }
    }
}

/// Configuration for export operations.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub pretty_print: bool,
    /// Include Unchanged entries in human-oriented output.
    pub include_unchanged: bool,
}

impl ExportConfig {
    pub fn new(pretty_print: bool, include_unchanged: bool) -> Self {
        Self {
            pretty_print,
            include_unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_kind_as_str() {
        assert_eq!(CodeKind::Module.as_str(), "module");
        assert_eq!(CodeKind::Class.as_str(), "class");
        assert_eq!(CodeKind::Method { is_instance: true }.as_str(), "method");
        assert_eq!(
            CodeKind::MetaMember {
                label: "reader".to_string()
            }
            .as_str(),
            "meta"
        );
    }

    #[test]
    fn test_module_signature_root() {
        assert_eq!(CodeKind::Module.compose_signature(None, "Foo"), "Foo");
    }

    #[test]
    fn test_module_signature_nested() {
        assert_eq!(
            CodeKind::Class.compose_signature(Some("A::B"), "C"),
            "A::B::C"
        );
    }

    #[test]
    fn test_method_signature_instance() {
        let kind = CodeKind::Method { is_instance: true };
        assert_eq!(kind.compose_signature(Some("Foo"), "bar"), "Foo#bar");
    }

    #[test]
    fn test_method_signature_singleton() {
        let kind = CodeKind::Method { is_instance: false };
        assert_eq!(kind.compose_signature(Some("Foo"), "bar"), "Foo.bar");
    }

    #[test]
    fn test_method_signature_top_level() {
        let kind = CodeKind::Method { is_instance: true };
        assert_eq!(kind.compose_signature(None, "bar"), "#bar");
    }

    #[test]
    fn test_meta_member_signature() {
        let kind = CodeKind::MetaMember {
            label: "accessor".to_string(),
        };
        assert_eq!(
            kind.compose_signature(Some("Foo"), "baz"),
            "Foo {accessor baz}"
        );
    }

    #[test]
    fn test_sexp_equality_is_structural() {
        let a = Sexp::new(
            "binary".to_string(),
            None,
            vec![
                Sexp::new("integer".to_string(), Some("1".to_string()), vec![]),
                Sexp::new("integer".to_string(), Some("2".to_string()), vec![]),
            ],
        );
        let b = a.clone();
        assert_eq!(a, b);

        let mut c = a.clone();
        c.children[1].text = Some("3".to_string());
        assert_ne!(a, c);
    }
}
