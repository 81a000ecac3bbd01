//! The generic CST walker.
//!
//! One `GenericWalker` instance handles one file: it owns the scope stack
//! and the three output vectors, dispatches each CST node through a
//! `PolicyRecord`, and never panics on malformed input — a node it cannot
//! make sense of is either recursed into or silently skipped.

use tree_sitter::Node as TsNode;

use crate::identity;
use crate::model::{Edge, Node, UnresolvedReference, FILE_SCOPE_SENTINEL};
use crate::parsing::language::LanguageId;
use crate::parsing::policy::{PolicyRecord, SignatureStyle};
use crate::types::{EdgeKind, NodeKind, ReferenceKind, Visibility};

const COMMENT_KINDS: &[&str] = &[
    "comment",
    "line_comment",
    "block_comment",
    "documentation_comment",
];

const IDENTIFIER_KINDS: &[&str] = &["identifier", "type_identifier", "simple_identifier", "constant"];

pub struct GenericWalker<'p> {
    policy: &'p PolicyRecord,
    language: LanguageId,
    file_path: String,
    source: String,
    include_docs: bool,
    updated_at: u64,
    scope_ids: Vec<String>,
    scope_names: Vec<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub unresolved: Vec<UnresolvedReference>,
}

impl<'p> GenericWalker<'p> {
    pub fn new(
        policy: &'p PolicyRecord,
        language: LanguageId,
        file_path: impl Into<String>,
        source: impl Into<String>,
        include_docs: bool,
        updated_at: u64,
    ) -> Self {
        Self {
            policy,
            language,
            file_path: file_path.into(),
            source: source.into(),
            include_docs,
            updated_at,
            scope_ids: Vec::new(),
            scope_names: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    /// Entry point: walk the root node's named children depth-first.
    pub fn walk_root(&mut self, root: TsNode) {
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            self.dispatch(child);
        }
    }

    fn current_scope(&self) -> String {
        self.scope_ids
            .last()
            .cloned()
            .unwrap_or_else(|| FILE_SCOPE_SENTINEL.to_string())
    }

    fn text<'s>(&'s self, node: &TsNode) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn line_col(node: &TsNode) -> (u32, u32, u32, u32) {
        let start = node.start_position();
        let end = node.end_position();
        (
            start.row as u32 + 1,
            start.column as u32,
            end.row as u32 + 1,
            end.column as u32,
        )
    }

    /// Dispatch one CST node per the policy table's priority order. Recurses
    /// into named children when the node matches nothing.
    fn dispatch(&mut self, node: TsNode) {
        let kind = node.kind();
        let in_scope = !self.scope_ids.is_empty();

        // 1. Function type, with Go's top-level-method exception.
        if self.policy.function_types.contains(&kind) {
            let is_method_type = self.policy.method_types.contains(&kind);
            let treat_as_method =
                (in_scope && is_method_type) || (self.language == LanguageId::Go && kind == "method_declaration");
            if treat_as_method {
                self.emit_callable(node, NodeKind::Method);
            } else {
                self.emit_callable(node, NodeKind::Function);
            }
            self.recurse_into_body(node);
            return;
        }

        // 2. Class type.
        if self.policy.class_types.contains(&kind) {
            self.emit_container(node, NodeKind::Class, true);
            return;
        }

        // 3. Method type (not already matched via function types above).
        if self.policy.method_types.contains(&kind) {
            self.emit_callable(node, NodeKind::Method);
            self.recurse_into_body(node);
            return;
        }

        // 4. Interface / struct / enum type.
        if self.policy.interface_types.contains(&kind) {
            self.emit_container(node, NodeKind::Interface, true);
            return;
        }
        if self.policy.struct_types.contains(&kind) {
            self.emit_container(node, NodeKind::Struct, false);
            return;
        }
        if self.policy.enum_types.contains(&kind) {
            self.emit_container(node, NodeKind::Enum, false);
            return;
        }

        // 5. Import type.
        if self.policy.import_types.contains(&kind) {
            self.emit_import(node);
            self.recurse_children(node);
            return;
        }

        // 6. Call type.
        if self.policy.call_types.contains(&kind) {
            self.emit_call(node);
            self.recurse_children(node);
            return;
        }

        self.recurse_children(node);
    }

    fn recurse_children(&mut self, node: TsNode) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            self.dispatch(child);
        }
    }

    /// Walk the body field (if declared) for call sites and nested
    /// declarations inside a function/method, without re-emitting the
    /// function/method node itself.
    fn recurse_into_body(&mut self, node: TsNode) {
        if let Some(body_field) = self.policy.body_field {
            if let Some(body) = node.child_by_field_name(body_field) {
                self.recurse_children(body);
            }
        }
    }

    /// Name extraction: resolve via `field(nameField)`; recurse
    /// one level for a compound declarator (C/C++ function declarators);
    /// otherwise fall back to the first identifier-like named child.
    fn extract_name(&self, node: &TsNode) -> Option<String> {
        let resolved = match node.child_by_field_name(self.policy.name_field) {
            Some(field_node) if field_node.kind() == "function_declarator" || field_node.kind() == "pointer_declarator" => {
                Self::first_identifier_child(&field_node).or(Some(field_node))
            }
            Some(field_node) => Some(field_node),
            None => Self::first_identifier_child(node),
        };
        resolved
            .and_then(|n| n.utf8_text(self.source.as_bytes()).ok())
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
    }

    fn first_identifier_child<'t>(node: &TsNode<'t>) -> Option<TsNode<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .find(|c| IDENTIFIER_KINDS.contains(&c.kind()))
    }

    fn qualified_name(&self, name: &str) -> String {
        let mut parts = vec![self.file_path.clone()];
        parts.extend(self.scope_names.iter().cloned());
        parts.push(name.to_string());
        parts.join("::")
    }

    /// Signature extraction: concatenate params text with return
    /// text, joined by the language's separator.
    fn extract_signature(&self, node: &TsNode) -> Option<String> {
        let params_field = self.policy.params_field?;
        let params = node.child_by_field_name(params_field)?;
        let params_text = self.text(&params);
        let return_text = self
            .policy
            .return_field
            .and_then(|f| node.child_by_field_name(f))
            .map(|n| self.text(&n).to_string());

        let signature = match (self.policy.signature_style, return_text) {
            (SignatureStyle::ParamsThenReturn(sep), Some(ret)) if !ret.is_empty() => {
                format!("{params_text}{sep}{ret}")
            }
            (SignatureStyle::ParamsThenReturn(_), _) => params_text.to_string(),
            (SignatureStyle::ReturnThenParams, Some(ret)) if !ret.is_empty() => {
                format!("{ret} {params_text}")
            }
            (SignatureStyle::ReturnThenParams, _) => params_text.to_string(),
            (SignatureStyle::ParamsOnly, _) => params_text.to_string(),
        };
        Some(signature)
    }

    /// Docstring: walk preceding named comment siblings backwards,
    /// reverse to original order, strip comment markers, join with newlines.
    fn extract_docstring(&self, node: &TsNode) -> Option<String> {
        if !self.include_docs {
            return None;
        }
        let mut comments = Vec::new();
        let mut current = node.prev_named_sibling();
        while let Some(sibling) = current {
            if COMMENT_KINDS.contains(&sibling.kind()) {
                comments.push(self.text(&sibling).to_string());
                current = sibling.prev_named_sibling();
            } else {
                break;
            }
        }
        if comments.is_empty() {
            return None;
        }
        comments.reverse();
        let cleaned: Vec<String> = comments.iter().map(|c| strip_comment_markers(c)).collect();
        Some(cleaned.join("\n"))
    }

    /// Call-site name: the bare callee identifier, discarding any receiver.
    fn extract_call_name(&self, node: &TsNode) -> Option<String> {
        let callee = node
            .child_by_field_name("function")
            .or_else(|| {
                let mut cursor = node.walk();
                node.named_children(&mut cursor).next()
            })?;
        let name = match callee.kind() {
            "member_expression" | "attribute" | "field_expression" => callee
                .child_by_field_name("property")
                .or_else(|| callee.child_by_field_name("attribute"))
                .or_else(|| callee.child_by_field_name("field"))
                .map(|n| self.text(&n).to_string())
                .unwrap_or_else(|| self.text(&callee).to_string()),
            "scoped_identifier" => self.text(&callee).to_string(),
            _ => self.text(&callee).to_string(),
        };
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Inheritance: `extends_clause`/`class_heritage`/`superclass`
    /// contributes one `extends`; `implements_clause`/
    /// `class_interface_clause` contributes one `implements` per named child.
    fn extract_inheritance(&mut self, node: &TsNode, from_id: &str) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "extends_clause" | "class_heritage" | "superclass" => {
                    let mut inner_cursor = child.walk();
                    if let Some(first) = child.named_children(&mut inner_cursor).next() {
                        let name = self.text(&first).to_string();
                        if !name.is_empty() {
                            self.push_reference(from_id, name, ReferenceKind::Extends, &child);
                        }
                    }
                }
                "implements_clause" | "class_interface_clause" => {
                    let mut inner_cursor = child.walk();
                    let implemented: Vec<_> = child.named_children(&mut inner_cursor).collect();
                    for impl_child in implemented {
                        let name = self.text(&impl_child).to_string();
                        if !name.is_empty() {
                            self.push_reference(from_id, name, ReferenceKind::Implements, &impl_child);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn push_reference(&mut self, from_id: &str, name: String, kind: ReferenceKind, node: &TsNode) {
        let (line, column, _, _) = Self::line_col(node);
        self.unresolved.push(UnresolvedReference {
            from_node_id: from_id.to_string(),
            name,
            kind,
            line,
            column,
        });
    }

    fn emit_callable(&mut self, node: TsNode, kind: NodeKind) {
        let Some(name) = self.extract_name(&node) else {
            return;
        };
        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, kind, &name, start_line);
        let qualified_name = self.qualified_name(&name);

        let parent = self.current_scope();
        self.edges.push(Edge {
            source: parent,
            target: id.clone(),
            kind: EdgeKind::Contains,
        });

        let is_exported = self.policy.exported.map(|f| f(&node, &self.source));
        let is_async = self.policy.is_async.map(|f| f(&node, &self.source));
        let is_static = self.policy.is_static.map(|f| f(&node, &self.source));
        let visibility = self
            .policy
            .visibility
            .and_then(|f| f(&node, &name))
            .or(self.policy.default_visibility);

        self.nodes.push(Node {
            id: id.clone(),
            kind,
            name,
            qualified_name,
            file_path: self.file_path.clone(),
            language: self.language,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility,
            is_exported,
            is_async,
            is_static,
            is_abstract: None,
            signature: self.extract_signature(&node),
            docstring: self.extract_docstring(&node),
            decorators: None,
        });
    }

    /// Emit a class/interface/struct/enum node, its inheritance references
    /// (class-likes only, per `with_inheritance`), push it onto the scope
    /// stack, and recurse into its body.
    fn emit_container(&mut self, node: TsNode, kind: NodeKind, with_inheritance: bool) {
        let Some(name) = self.extract_name(&node) else {
            return;
        };
        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, kind, &name, start_line);
        let qualified_name = self.qualified_name(&name);

        let parent = self.current_scope();
        self.edges.push(Edge {
            source: parent,
            target: id.clone(),
            kind: EdgeKind::Contains,
        });

        if with_inheritance {
            self.extract_inheritance(&node, &id);
        }

        let is_exported = self.policy.exported.map(|f| f(&node, &self.source));
        let visibility = self
            .policy
            .visibility
            .and_then(|f| f(&node, &name))
            .or(self.policy.default_visibility);

        self.nodes.push(Node {
            id: id.clone(),
            kind,
            name: name.clone(),
            qualified_name,
            file_path: self.file_path.clone(),
            language: self.language,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility,
            is_exported,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: self.extract_docstring(&node),
            decorators: None,
        });

        self.scope_ids.push(id);
        self.scope_names.push(name);
        if let Some(body_field) = self.policy.body_field {
            if let Some(body) = node.child_by_field_name(body_field) {
                self.recurse_children(body);
            } else {
                self.recurse_children(node);
            }
        } else {
            self.recurse_children(node);
        }
        self.scope_ids.pop();
        self.scope_names.pop();
    }

    fn emit_import(&mut self, node: TsNode) {
        let name = import_module_name(&node, &self.source);
        let Some(name) = name else { return };
        let from_id = self.current_scope();
        self.push_reference(&from_id, name, ReferenceKind::Imports, &node);
    }

    fn emit_call(&mut self, node: TsNode) {
        let Some(name) = self.extract_call_name(&node) else {
            return;
        };
        let from_id = self.current_scope();
        self.push_reference(&from_id, name, ReferenceKind::Calls, &node);
    }
}

fn strip_comment_markers(text: &str) -> String {
    text.trim()
        .trim_start_matches("/**")
        .trim_start_matches("/*")
        .trim_end_matches("*/")
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim_start_matches("///").trim_start_matches("//").trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Best-effort module name for an import statement: the first string
/// literal found anywhere under the node (Go nests it in `import_spec`),
/// with surrounding quotes stripped, or the first top-level
/// identifier/scoped-identifier's text when there is no string literal
/// (e.g. Rust's `use a::b::c;`).
fn import_module_name(node: &TsNode, source: &str) -> Option<String> {
    if let Some(text) = first_string_literal(node, source) {
        return Some(text.trim_matches(|c| c == '"' || c == '\'').to_string());
    }
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier" | "dotted_name" | "qualified_name"))
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
        .map(|s| s.to_string())
}

fn first_string_literal<'a>(node: &TsNode, source: &'a str) -> Option<&'a str> {
    if matches!(node.kind(), "string" | "string_literal" | "interpreted_string_literal" | "raw_string_literal") {
        return node.utf8_text(source.as_bytes()).ok();
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(found) = first_string_literal(&child, source) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::policy::policy_for;
    use tree_sitter::Parser;

    fn parse(language: LanguageId, source: &str) -> tree_sitter::Tree {
        let grammar: tree_sitter::Language = match language {
            LanguageId::Rust => tree_sitter_rust::LANGUAGE.into(),
            LanguageId::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
            _ => unreachable!(),
        };
        let mut parser = Parser::new();
        parser.set_language(&grammar).unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn rust_top_level_fn_is_function_nested_is_method() {
        let source = "pub trait Repository { fn find(&self) -> i32; }\nfn standalone() {}";
        let tree = parse(LanguageId::Rust, source);
        let policy = policy_for(LanguageId::Rust).unwrap();
        let mut walker = GenericWalker::new(&policy, LanguageId::Rust, "traits.rs", source, false, 0);
        walker.walk_root(tree.root_node());

        let kinds: Vec<_> = walker.nodes.iter().map(|n| (n.name.clone(), n.kind)).collect();
        assert!(kinds.contains(&("Repository".to_string(), NodeKind::Interface)));
        assert!(kinds.contains(&("find".to_string(), NodeKind::Method)));
        assert!(kinds.contains(&("standalone".to_string(), NodeKind::Function)));
    }

    #[test]
    fn typescript_export_function_is_marked_exported() {
        let source = "export function processPayment(amount: number): Promise<Receipt> { return stripe.charge(amount); }";
        let tree = parse(LanguageId::TypeScript, source);
        let policy = policy_for(LanguageId::TypeScript).unwrap();
        let mut walker = GenericWalker::new(&policy, LanguageId::TypeScript, "payment.ts", source, false, 0);
        walker.walk_root(tree.root_node());

        let function = walker
            .nodes
            .iter()
            .find(|n| n.name == "processPayment")
            .expect("function node emitted");
        assert_eq!(function.is_exported, Some(true));
        assert!(function.signature.as_deref().unwrap_or("").contains("amount: number"));

        let call = walker
            .unresolved
            .iter()
            .find(|r| r.kind == ReferenceKind::Calls)
            .expect("call reference emitted");
        assert_eq!(call.name, "charge");
    }

    #[test]
    fn python_leading_underscore_yields_protected_visibility() {
        let source = "class Widget:\n    def _internal(self):\n        pass\n";
        let tree = parse(LanguageId::Python, source);
        let policy = policy_for(LanguageId::Python).unwrap();
        let mut walker = GenericWalker::new(&policy, LanguageId::Python, "widget.py", source, false, 0);
        walker.walk_root(tree.root_node());

        let method = walker.nodes.iter().find(|n| n.name == "_internal").unwrap();
        assert_eq!(method.visibility, Some(Visibility::Protected));
    }

    #[test]
    fn anonymous_nodes_are_not_emitted() {
        let source = "fn named() {}";
        let tree = parse(LanguageId::Rust, source);
        let policy = policy_for(LanguageId::Rust).unwrap();
        let mut walker = GenericWalker::new(&policy, LanguageId::Rust, "a.rs", source, false, 0);
        walker.walk_root(tree.root_node());
        assert!(walker.nodes.iter().all(|n| !n.name.is_empty()));
    }
}
