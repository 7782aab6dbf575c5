//! Ruby structural extractor using tree-sitter.
//!
//! Walks the tree-sitter-ruby syntax tree depth-first and records every
//! module, class, and method declaration into a `StructureModel`, along
//! with members synthesized from `attr_*`-style declarative calls. The
//! walk recognizes a fixed vocabulary of node kinds; everything else is
//! traversed transparently.

use tree_sitter::{Node, Parser};

use super::handlers::{self, HandlerConfig};
use super::helpers::{body_node, field_or_kind, node_text, snapshot, start_line};
use crate::error::{Result, StructureError};
use crate::model::StructureModel;
use crate::types::{CodeKind, CodeObject, ObjectId, Sexp};

/// Parse Ruby source into a structure model with the default handler set.
pub fn parse(source: &str, name: &str) -> Result<StructureModel> {
    StructureBuilder::new(name, HandlerConfig::default()).build(source)
}

/// Builds a `StructureModel` from one Ruby source.
///
/// A builder owns one walk: its scope stack lives for the duration of a
/// single `build` call and is never shared between runs. Independent
/// builders have disjoint state and may run on separate threads.
pub struct StructureBuilder {
    handlers: HandlerConfig,
    scope: Vec<ObjectId>,
    model: StructureModel,
}

impl StructureBuilder {
    pub fn new(name: &str, handlers: HandlerConfig) -> Self {
        Self {
            handlers,
            scope: Vec::new(),
            model: StructureModel::new(name),
        }
    }

    /// Run the walk and yield the completed model.
    pub fn build(mut self, source: &str) -> Result<StructureModel> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_ruby::LANGUAGE.into())
            .map_err(|e| StructureError::Grammar {
                message: e.to_string(),
            })?;

        let tree = parser.parse(source, None).ok_or_else(|| StructureError::Parse {
            name: self.model.name.clone(),
        })?;

        // The walk starts in instance scope.
        self.walk(&tree.root_node(), source, true)?;
        debug_assert!(self.scope.is_empty(), "scope stack must drain by the end of a walk");
        Ok(self.model)
    }

    fn scope_top(&self) -> Option<ObjectId> {
        self.scope.last().copied()
    }

    /// Dispatch one node by kind; unrecognized kinds recurse unchanged.
    fn walk(&mut self, node: &Node, source: &str, instance_scope: bool) -> Result<()> {
        // Anonymous tokens (`class`, `<<`, punctuation) share kind strings
        // with named nodes but carry no declarations.
        if !node.is_named() {
            return Ok(());
        }
        match node.kind() {
            "module" => self.on_module(node, source, instance_scope),
            "class" => self.on_class(node, source, instance_scope),
            "method" => self.on_method(node, source, instance_scope),
            "singleton_method" => self.on_singleton_method(node, source, instance_scope),
            "singleton_class" => self.on_singleton_class(node, source),
            "call" if node.child_by_field_name("receiver").is_none() => {
                self.on_call(node, source, instance_scope)
            }
            _ => self.walk_children(node, source, instance_scope),
        }
    }

    fn walk_children(&mut self, node: &Node, source: &str, instance_scope: bool) -> Result<()> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(&child, source, instance_scope)?;
        }
        Ok(())
    }

    /// Register an object, then run the nested step under its scope.
    ///
    /// The canonical id for the signature (the registry entry, whether new
    /// or pre-existing) is pushed before the nested step and popped after
    /// it, on the success and the error path alike, so an enclosing caller
    /// never observes an unbalanced stack.
    fn record<F>(&mut self, object: CodeObject, nested: F) -> Result<ObjectId>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let id = self.model.register(object);
        self.scope.push(id);
        let outcome = nested(self);
        self.scope.pop();
        outcome?;
        Ok(id)
    }

    /// The required name of a declaration node.
    fn declared_name(&self, node: &Node, source: &str) -> Result<String> {
        node.child_by_field_name("name")
            .map(|n| node_text(&n, source).to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| StructureError::MalformedNode {
                kind: node.kind().to_string(),
                line: start_line(node),
            })
    }

    /// Snapshot a declaration body; a missing body and a comment-only
    /// body both normalize to the empty snapshot.
    fn body_snapshot(body: Option<&Node>, source: &str) -> Sexp {
        match body.map(|b| snapshot(b, source)) {
            Some(snap) if snap.children.is_empty() && snap.text.is_none() => Sexp::default(),
            Some(snap) => snap,
            None => Sexp::default(),
        }
    }

    /// A method's comparable content is its parameter list plus its body.
    /// The wrapper kind is fixed so that `def self.x` and a definition
    /// inside `class << self` compare by content, not by syntax form.
    fn method_snapshot(node: &Node, source: &str) -> Sexp {
        let mut children = Vec::new();
        if let Some(parameters) = field_or_kind(node, "parameters", "method_parameters") {
            children.push(snapshot(&parameters, source));
        }
        let body = Self::body_snapshot(body_node(node).as_ref(), source);
        if body != Sexp::default() {
            children.push(body);
        }
        Sexp::new("method".to_string(), None, children)
    }

    fn on_module(&mut self, node: &Node, source: &str, instance_scope: bool) -> Result<()> {
        let name = self.declared_name(node, source)?;
        let body = body_node(node);
        let object = CodeObject::new(
            name,
            CodeKind::Module,
            self.scope_top(),
            Self::body_snapshot(body.as_ref(), source),
        );

        self.record(object, |builder| match body {
            Some(body) => builder.walk(&body, source, instance_scope),
            None => Ok(()),
        })?;
        Ok(())
    }

    fn on_class(&mut self, node: &Node, source: &str, instance_scope: bool) -> Result<()> {
        let name = self.declared_name(node, source)?;
        let superclass = field_or_kind(node, "superclass", "superclass");
        let body = body_node(node);
        let object = CodeObject::new(
            name,
            CodeKind::Class,
            self.scope_top(),
            Self::body_snapshot(body.as_ref(), source),
        );

        self.record(object, |builder| {
            if let Some(superclass) = superclass {
                builder.walk(&superclass, source, instance_scope)?;
            }
            match body {
                Some(body) => builder.walk(&body, source, instance_scope),
                None => Ok(()),
            }
        })?;
        Ok(())
    }

    /// `def foo` binds as an instance method unless the surrounding
    /// singleton-class context says otherwise.
    fn on_method(&mut self, node: &Node, source: &str, instance_scope: bool) -> Result<()> {
        let name = self.declared_name(node, source)?;
        let body = body_node(node);
        let object = CodeObject::new(
            name,
            CodeKind::Method {
                is_instance: instance_scope,
            },
            self.scope_top(),
            Self::method_snapshot(node, source),
        );

        self.record(object, |builder| match body {
            Some(body) => builder.walk(&body, source, instance_scope),
            None => Ok(()),
        })?;
        Ok(())
    }

    /// `def receiver.foo` is always a singleton method; the receiver is
    /// still walked for declarations nested inside it, but its shape does
    /// not affect registration.
    fn on_singleton_method(
        &mut self,
        node: &Node,
        source: &str,
        instance_scope: bool,
    ) -> Result<()> {
        let name = self.declared_name(node, source)?;
        let receiver = node.child_by_field_name("object");
        let body = body_node(node);
        let object = CodeObject::new(
            name,
            CodeKind::Method { is_instance: false },
            self.scope_top(),
            Self::method_snapshot(node, source),
        );

        self.record(object, |builder| {
            if let Some(receiver) = receiver {
                builder.walk(&receiver, source, instance_scope)?;
            }
            match body {
                Some(body) => builder.walk(&body, source, instance_scope),
                None => Ok(()),
            }
        })?;
        Ok(())
    }

    /// `class << receiver`: definitions inside bind to the singleton, so
    /// the instance flag is cleared for the receiver and body and reverts
    /// to the caller's value on return, error paths included, because the
    /// flag travels as a parameter rather than shared state.
    fn on_singleton_class(&mut self, node: &Node, source: &str) -> Result<()> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(&child, source, false)?;
        }
        Ok(())
    }

    /// A receiverless call: always walk the arguments (and any attached
    /// block), and synthesize members when the name matches a configured
    /// declaration handler.
    fn on_call(&mut self, node: &Node, source: &str, instance_scope: bool) -> Result<()> {
        self.walk_children(node, source, instance_scope)?;

        let label = node
            .child_by_field_name("method")
            .and_then(|n| self.handlers.label_for(node_text(&n, source)))
            .map(str::to_string);

        if let Some(label) = label {
            if let Some(arguments) = field_or_kind(node, "arguments", "argument_list") {
                self.synthesize_members(&arguments, source, &label)?;
            }
        }
        Ok(())
    }

    /// One synthesized member per resolvable argument, parented at the
    /// current scope. Unresolvable arguments are skipped; synthesis never
    /// opens a new scope for nested processing.
    fn synthesize_members(&mut self, arguments: &Node, source: &str, label: &str) -> Result<()> {
        let scope = self.scope_top();
        let mut cursor = arguments.walk();
        for arg in arguments.children(&mut cursor) {
            if let Some(name) = handlers::name_for_arg(&arg, source) {
                let member = CodeObject::new(
                    name,
                    CodeKind::MetaMember {
                        label: label.to_string(),
                    },
                    scope,
                    Sexp::default(),
                );
                self.record(member, |_| Ok(()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signatures(model: &StructureModel) -> Vec<String> {
        model.signatures().signatures().map(String::from).collect()
    }

    #[test]
    fn test_parse_class_with_instance_method() {
        let source = r#"
class Foo
  def bar
    42
  end
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert_eq!(signatures(&model), vec!["Foo", "Foo#bar"]);
        assert_eq!(model.roots().len(), 1);
    }

    #[test]
    fn test_parse_nested_modules() {
        let source = r#"
module A
  module B
    class C
      def run
      end
    end
  end
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert_eq!(signatures(&model), vec!["A", "A::B", "A::B::C", "A::B::C#run"]);
        let roots: Vec<&str> = model.roots().signatures().collect();
        assert_eq!(roots, vec!["A"]);
    }

    #[test]
    fn test_singleton_method_uses_dot_separator() {
        let source = r#"
class Foo
  def self.bar
  end
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert!(model.signatures().contains("Foo.bar"));
        assert!(!model.signatures().contains("Foo#bar"));
    }

    #[test]
    fn test_singleton_class_block_clears_instance_scope() {
        let source = r#"
class Foo
  class << self
    def bar
    end
  end

  def baz
  end
end
"#;
        let model = parse(source, "test.rb").unwrap();
        // Inside `class << self` the definition binds to the singleton.
        assert!(model.signatures().contains("Foo.bar"));
        // After the block the flag reverts: baz is an instance method.
        assert!(model.signatures().contains("Foo#baz"));
    }

    #[test]
    fn test_attr_accessor_synthesizes_members() {
        let source = r#"
class Foo
  attr_accessor :baz, :qux
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert!(model.signatures().contains("Foo {accessor baz}"));
        assert!(model.signatures().contains("Foo {accessor qux}"));
    }

    #[test]
    fn test_attr_reader_skips_unresolvable_arguments() {
        let source = r#"
class Foo
  attr_reader :name, 1, :"computed"
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert!(model.signatures().contains("Foo {reader name}"));
        assert!(model.signatures().contains("Foo {reader computed}"));
        // The integer argument produced nothing; class + two members.
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn test_string_argument_resolves_like_a_symbol() {
        let source = r#"
class Foo
  attr_writer "level"
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert!(model.signatures().contains("Foo {writer level}"));
    }

    #[test]
    fn test_interpolated_argument_is_skipped() {
        let source = r#"
class Foo
  attr_reader :"pre_#{suffix}"
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_receiver_call_is_not_a_handler() {
        let source = r#"
class Foo
  Helper.attr_accessor :baz
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert!(!model.signatures().contains("Foo {accessor baz}"));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_top_level_handler_call_becomes_root() {
        let source = "attr_reader :name\n";
        let model = parse(source, "test.rb").unwrap();
        assert!(model.roots().contains(" {reader name}"));
    }

    #[test]
    fn test_reopened_class_merges_into_canonical_entry() {
        let source = r#"
class Foo
  def a
  end
end

class Foo
  def b
  end
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert_eq!(model.roots().len(), 1);
        let foo = model.roots().get("Foo").unwrap();
        let children: Vec<String> =
            model.child_entries(foo).into_iter().map(|(s, _)| s).collect();
        assert_eq!(children, vec!["Foo#a", "Foo#b"]);
    }

    #[test]
    fn test_method_nested_in_method_parents_at_method() {
        let source = r#"
class Foo
  def outer
    def inner
    end
  end
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert!(model.signatures().contains("Foo#outer#inner"));
    }

    #[test]
    fn test_formatting_and_comments_do_not_change_the_model() {
        let a = parse("class Foo\n  def bar\n    1 + 2\n  end\nend\n", "a.rb").unwrap();
        let b = parse(
            "# doc\nclass Foo\n\n\n  def bar\n    # inline\n    1    +    2\n  end\nend\n",
            "b.rb",
        )
        .unwrap();

        let foo_a = a.roots().get("Foo").unwrap();
        let foo_b = b.roots().get("Foo").unwrap();
        assert!(a.object_eq(foo_a, &b, foo_b));

        let bar_a = a.signatures().get("Foo#bar").unwrap();
        let bar_b = b.signatures().get("Foo#bar").unwrap();
        assert!(a.object_eq(bar_a, &b, bar_b));
    }

    #[test]
    fn test_literal_change_breaks_body_equality() {
        let a = parse("class Foo\n  def bar\n    1\n  end\nend\n", "a.rb").unwrap();
        let b = parse("class Foo\n  def bar\n    2\n  end\nend\n", "b.rb").unwrap();

        let bar_a = a.signatures().get("Foo#bar").unwrap();
        let bar_b = b.signatures().get("Foo#bar").unwrap();
        assert!(!a.object_eq(bar_a, &b, bar_b));
    }

    #[test]
    fn test_parameter_change_breaks_method_equality() {
        let a = parse("class Foo\n  def add(a)\n    a\n  end\nend\n", "a.rb").unwrap();
        let b = parse("class Foo\n  def add(a, b)\n    a\n  end\nend\n", "b.rb").unwrap();

        let add_a = a.signatures().get("Foo#add").unwrap();
        let add_b = b.signatures().get("Foo#add").unwrap();
        assert!(!a.object_eq(add_a, &b, add_b));
    }

    #[test]
    fn test_comment_only_body_equals_missing_body() {
        let a = parse("class Foo\nend\n", "a.rb").unwrap();
        let b = parse("class Foo\n  # placeholder\nend\n", "b.rb").unwrap();

        let foo_a = a.roots().get("Foo").unwrap();
        let foo_b = b.roots().get("Foo").unwrap();
        assert!(a.object_eq(foo_a, &b, foo_b));
    }

    #[test]
    fn test_declarations_inside_call_blocks_are_found() {
        let source = r#"
configure do
  class Inline
    def run
    end
  end
end
"#;
        let model = parse(source, "test.rb").unwrap();
        assert!(model.roots().contains("Inline"));
        assert!(model.signatures().contains("Inline#run"));
    }

    #[test]
    fn test_custom_handler_configuration() {
        let source = r#"
class Post
  has_many :comments
end
"#;
        let config = HandlerConfig::new([(
            "has_many".to_string(),
            "association".to_string(),
        )]);
        let model = StructureBuilder::new("post.rb", config)
            .build(source)
            .unwrap();
        assert!(model.signatures().contains("Post {association comments}"));
    }
}
