//! Helper functions for tree-sitter AST navigation.

use tree_sitter::Node;

use crate::types::Sexp;

/// Get the text content of a node.
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    if start < source.len() && end <= source.len() && start < end {
        &source[start..end]
    } else {
        ""
    }
}

/// Find the first child of a specific type.
#[allow(clippy::manual_find)]
pub fn find_child_by_type<'a>(node: &Node<'a>, type_name: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == type_name {
            return Some(child);
        }
    }
    None
}

/// Find a child by field name, falling back to a kind lookup for grammar
/// versions that do not label the field.
pub fn field_or_kind<'a>(node: &Node<'a>, field: &str, kind: &str) -> Option<Node<'a>> {
    node.child_by_field_name(field)
        .or_else(|| find_child_by_type(node, kind))
}

/// The body of a declaration node (`module`, `class`, `method`, ...).
pub fn body_node<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    field_or_kind(node, "body", "body_statement")
}

/// Get line number (1-indexed) from a node.
pub fn start_line(node: &Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Build a structural snapshot of a subtree.
///
/// Comment nodes are dropped so that comment-only edits compare equal;
/// leaf token text is kept so that literal and identifier changes do not.
pub fn snapshot(node: &Node, source: &str) -> Sexp {
    let mut children = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "comment" {
            continue;
        }
        children.push(snapshot(&child, source));
    }

    // Leaf-ness follows the tree, not the filtered child list: a node
    // whose children were all comments must not collapse into its source
    // text, which would smuggle the comments back in.
    let text = if node.child_count() == 0 {
        Some(node_text(node, source).to_string())
    } else {
        None
    };

    Sexp::new(node.kind().to_string(), text, children)
}
