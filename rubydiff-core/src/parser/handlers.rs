//! Declarative-call recognizers.
//!
//! Ruby declares accessor methods through calls like `attr_accessor :name`
//! rather than explicit `def` nodes. A small, configurable set of such
//! calls is recognized and each resolvable argument is turned into a
//! synthesized member of the enclosing scope. Resolution is best-effort:
//! arguments whose value cannot be read off the literal (computed names,
//! interpolation, anything that is not a symbol or plain string) are
//! skipped without error.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tree_sitter::Node;

use super::helpers::node_text;

/// Default declarative calls and the member labels they produce.
static DEFAULT_HANDLERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("attr_accessor", "accessor"),
        ("attr_writer", "writer"),
        ("attr_reader", "reader"),
    ])
});

/// Immutable call-name to member-label configuration for one builder.
///
/// Each builder owns its configuration; two builders never observe each
/// other's handler sets.
#[derive(Clone, Debug)]
pub struct HandlerConfig {
    labels: HashMap<String, String>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_HANDLERS
                .iter()
                .map(|(name, label)| ((*name).to_string(), (*label).to_string())),
        )
    }
}

impl HandlerConfig {
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            labels: entries.into_iter().collect(),
        }
    }

    /// The member label for a recognized call name, if any.
    pub fn label_for(&self, call_name: &str) -> Option<&str> {
        self.labels.get(call_name).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Resolve a member name from one call argument, if its shape allows.
///
/// `:name` resolves to `name`; `:"computed"` and `"name"` resolve via
/// their string content unless interpolated. Any other shape yields None.
pub fn name_for_arg(arg: &Node, source: &str) -> Option<String> {
    match arg.kind() {
        "simple_symbol" => {
            let text = node_text(arg, source).trim_start_matches(':');
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        }
        "delimited_symbol" | "string" => literal_content(arg, source),
        _ => None,
    }
}

/// The literal content of a quoted node, rejecting interpolation.
fn literal_content(node: &Node, source: &str) -> Option<String> {
    let mut content = None;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_content" => content = Some(node_text(&child, source).to_string()),
            "interpolation" => return None,
            _ => {}
        }
    }
    content
}
