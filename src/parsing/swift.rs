//! The Swift bespoke walker.
//!
//! Swift overloads `class_declaration` across class/struct/actor/
//! extension/enum and exposes property wrappers, protocols with
//! associated types, and `init`/`deinit`/`subscript` declarations that
//! the generic policy table has no vocabulary for.

use tree_sitter::Node as TsNode;

use crate::identity;
use crate::model::{Edge, Node, UnresolvedReference, FILE_SCOPE_SENTINEL};
use crate::parsing::language::LanguageId;
use crate::types::{EdgeKind, NodeKind, ReferenceKind, Visibility};

pub struct SwiftWalker {
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

impl SwiftWalker {
    pub fn new(file_path: impl Into<String>, source: impl Into<String>, include_docs: bool, updated_at: u64) -> Self {
        Self {
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

    pub fn walk_root(&mut self, root: TsNode) {
        let mut cursor = root.walk();
        let children: Vec<_> = root.named_children(&mut cursor).collect();
        for child in children {
            self.dispatch(child);
        }
    }

    fn text(&self, node: &TsNode) -> String {
        node.utf8_text(self.source.as_bytes()).unwrap_or("").to_string()
    }

    fn line_col(node: &TsNode) -> (u32, u32, u32, u32) {
        let start = node.start_position();
        let end = node.end_position();
        (start.row as u32 + 1, start.column as u32, end.row as u32 + 1, end.column as u32)
    }

    fn current_scope(&self) -> String {
        self.scope_ids.last().cloned().unwrap_or_else(|| FILE_SCOPE_SENTINEL.to_string())
    }

    fn has_bare_child_token(node: &TsNode, source: &str, token: &str) -> bool {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .any(|c| c.utf8_text(source.as_bytes()).unwrap_or("") == token)
    }

    fn dispatch(&mut self, node: TsNode) {
        match node.kind() {
            "class_declaration" => self.handle_class_declaration(node),
            "property_declaration" | "protocol_property_declaration" => self.handle_property(node),
            "subscript_declaration" => self.handle_subscript(node),
            "typealias_declaration" | "associatedtype_declaration" => self.handle_type_alias(node),
            "init_declaration" => self.handle_init(node),
            "deinit_declaration" => self.handle_deinit(node),
            "protocol_declaration" => self.handle_protocol(node),
            "function_declaration" | "protocol_function_declaration" => self.handle_function(node),
            "enum_entry" => self.handle_enum_entry(node),
            _ => self.recurse(node),
        }
    }

    fn recurse(&mut self, node: TsNode) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            self.dispatch(child);
        }
    }

    fn recurse_body_field(&mut self, node: TsNode, field: &str) {
        if let Some(body) = node.child_by_field_name(field) {
            self.recurse(body);
        }
    }

    fn name_of(&self, node: &TsNode) -> Option<String> {
        let candidate = node.child_by_field_name("name").or_else(|| {
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .find(|c| matches!(c.kind(), "type_identifier" | "simple_identifier"))
        })?;
        let name = self.text(&candidate);
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// `class_declaration` routes to `class`/`struct`/`actor`/`extension`/
    /// `enum` by a bare child token; extensions append a `where`-clause
    /// suffix to the extended type's name.
    fn handle_class_declaration(&mut self, node: TsNode) {
        let source = self.source.clone();
        let is_struct = Self::has_bare_child_token(&node, &source, "struct");
        let is_actor = Self::has_bare_child_token(&node, &source, "actor");
        let is_extension = Self::has_bare_child_token(&node, &source, "extension");
        let is_enum = Self::has_bare_child_token(&node, &source, "enum");

        let kind = if is_struct {
            NodeKind::Struct
        } else if is_enum {
            NodeKind::Enum
        } else {
            // class, actor, and extension all emit a `class` node.
            NodeKind::Class
        };

        let Some(mut name) = self.name_of(&node) else { return };
        if is_extension {
            if let Some(where_clause) = {
                let mut cursor = node.walk();
                node.named_children(&mut cursor).find(|c| c.kind() == "type_constraints")
            } {
                name = format!("{name} {}", self.text(&where_clause));
            }
        }
        let _ = is_actor;

        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, kind, &name, start_line);
        self.edges.push(Edge {
            source: self.current_scope(),
            target: id.clone(),
            kind: EdgeKind::Contains,
        });

        self.extract_inheritance(&node, &id);

        let mut qualified = vec![self.file_path.clone()];
        qualified.extend(self.scope_names.iter().cloned());
        qualified.push(name.clone());

        self.nodes.push(Node {
            id: id.clone(),
            kind,
            name: name.clone(),
            qualified_name: qualified.join("::"),
            file_path: self.file_path.clone(),
            language: LanguageId::Swift,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility: self.visibility_of(&node).or(Some(Visibility::Internal)),
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: self.docstring_for(&node),
            decorators: None,
        });

        self.scope_ids.push(id);
        self.scope_names.push(name);
        self.recurse_body_field(node, "body");
        self.scope_ids.pop();
        self.scope_names.pop();
    }

    fn handle_protocol(&mut self, node: TsNode) {
        let Some(name) = self.name_of(&node) else { return };
        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, NodeKind::Interface, &name, start_line);
        self.edges.push(Edge {
            source: self.current_scope(),
            target: id.clone(),
            kind: EdgeKind::Contains,
        });
        self.extract_inheritance(&node, &id);

        let mut qualified = vec![self.file_path.clone()];
        qualified.extend(self.scope_names.iter().cloned());
        qualified.push(name.clone());

        self.nodes.push(Node {
            id: id.clone(),
            kind: NodeKind::Interface,
            name: name.clone(),
            qualified_name: qualified.join("::"),
            file_path: self.file_path.clone(),
            language: LanguageId::Swift,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility: self.visibility_of(&node).or(Some(Visibility::Internal)),
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: self.docstring_for(&node),
            decorators: None,
        });

        self.scope_ids.push(id);
        self.scope_names.push(name);
        if let Some(body) = node.child_by_field_name("body").or_else(|| {
            let mut cursor = node.walk();
            node.named_children(&mut cursor).find(|c| c.kind() == "protocol_body")
        }) {
            self.recurse(body);
        }
        self.scope_ids.pop();
        self.scope_names.pop();
    }

    fn handle_function(&mut self, node: TsNode) {
        let Some(name) = self.name_of(&node) else { return };
        let kind = if self.scope_ids.is_empty() { NodeKind::Function } else { NodeKind::Method };
        self.emit_callable(node, kind, name);
    }

    fn handle_init(&mut self, node: TsNode) {
        self.emit_callable(node, NodeKind::Method, "init".to_string());
    }

    fn handle_deinit(&mut self, node: TsNode) {
        self.emit_callable(node, NodeKind::Method, "deinit".to_string());
    }

    fn handle_subscript(&mut self, node: TsNode) {
        self.emit_callable(node, NodeKind::Method, "subscript".to_string());
    }

    fn emit_callable(&mut self, node: TsNode, kind: NodeKind, name: String) {
        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, kind, &name, start_line);
        self.edges.push(Edge {
            source: self.current_scope(),
            target: id.clone(),
            kind: EdgeKind::Contains,
        });

        let is_async = Self::has_bare_child_token(&node, &self.source, "async");
        let is_static = Self::has_bare_child_token(&node, &self.source, "static")
            || Self::has_bare_child_token(&node, &self.source, "class");

        let signature = self.build_signature(&node);

        let mut qualified = vec![self.file_path.clone()];
        qualified.extend(self.scope_names.iter().cloned());
        qualified.push(name.clone());

        self.nodes.push(Node {
            id,
            kind,
            name,
            qualified_name: qualified.join("::"),
            file_path: self.file_path.clone(),
            language: LanguageId::Swift,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility: self.visibility_of(&node).or(Some(Visibility::Internal)),
            is_exported: None,
            is_async: Some(is_async),
            is_static: Some(is_static),
            is_abstract: None,
            signature,
            docstring: self.docstring_for(&node),
            decorators: None,
        });

        if let Some(body) = node.child_by_field_name("body") {
            self.walk_calls(body);
        }
    }

    /// `subscript_declaration` has no `parameters` field; its signature is
    /// built from `parameter` and `user_type` children directly.
    fn build_signature(&self, node: &TsNode) -> Option<String> {
        if let Some(params) = node.child_by_field_name("parameters") {
            let params_text = self.text(&params);
            return node
                .child_by_field_name("return_type")
                .map(|ret| format!("{params_text} -> {}", self.text(&ret)))
                .or(Some(params_text));
        }
        if node.kind() == "subscript_declaration" {
            let mut cursor = node.walk();
            let parts: Vec<String> = node
                .named_children(&mut cursor)
                .filter(|c| matches!(c.kind(), "parameter" | "user_type"))
                .map(|c| self.text(&c))
                .collect();
            if !parts.is_empty() {
                return Some(parts.join(", "));
            }
        }
        None
    }

    fn handle_property(&mut self, node: TsNode) {
        let Some(pattern) = node.child_by_field_name("name").or_else(|| {
            let mut cursor = node.walk();
            node.named_children(&mut cursor).find(|c| c.kind() == "pattern")
        }) else {
            self.recurse(node);
            return;
        };
        let mut cursor = pattern.walk();
        let Some(ident) = pattern
            .named_children(&mut cursor)
            .find(|c| c.kind() == "simple_identifier")
            .or(Some(pattern))
        else {
            return;
        };
        let name = self.text(&ident);
        if name.is_empty() {
            return;
        }

        let is_top_level = self.scope_ids.is_empty();
        let is_let = Self::has_bare_child_token(&node, &self.source, "let");
        let kind = if is_top_level && is_let { NodeKind::Constant } else { NodeKind::Property };

        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, kind, &name, start_line);
        self.edges.push(Edge {
            source: self.current_scope(),
            target: id.clone(),
            kind: EdgeKind::Contains,
        });

        let decorators = self.preceding_attributes(&node);

        let mut qualified = vec![self.file_path.clone()];
        qualified.extend(self.scope_names.iter().cloned());
        qualified.push(name.clone());

        self.nodes.push(Node {
            id,
            kind,
            name,
            qualified_name: qualified.join("::"),
            file_path: self.file_path.clone(),
            language: LanguageId::Swift,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility: self.visibility_of(&node).or(Some(Visibility::Internal)),
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: self.docstring_for(&node),
            decorators: if decorators.is_empty() { None } else { Some(decorators) },
        });
    }

    fn handle_type_alias(&mut self, node: TsNode) {
        let mut cursor = node.walk();
        let Some(name_node) = node.named_children(&mut cursor).find(|c| c.kind() == "type_identifier") else {
            return;
        };
        let name = self.text(&name_node);
        if name.is_empty() {
            return;
        }
        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, NodeKind::TypeAlias, &name, start_line);
        self.edges.push(Edge {
            source: self.current_scope(),
            target: id.clone(),
            kind: EdgeKind::Contains,
        });
        let mut qualified = vec![self.file_path.clone()];
        qualified.extend(self.scope_names.iter().cloned());
        qualified.push(name.clone());

        self.nodes.push(Node {
            id,
            kind: NodeKind::TypeAlias,
            name,
            qualified_name: qualified.join("::"),
            file_path: self.file_path.clone(),
            language: LanguageId::Swift,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility: None,
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: None,
            decorators: None,
        });
    }

    fn handle_enum_entry(&mut self, node: TsNode) {
        let mut cursor = node.walk();
        let Some(name_node) = node.named_children(&mut cursor).find(|c| c.kind() == "simple_identifier") else {
            return;
        };
        let name = self.text(&name_node);
        if name.is_empty() {
            return;
        }
        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, NodeKind::EnumMember, &name, start_line);
        self.edges.push(Edge {
            source: self.current_scope(),
            target: id.clone(),
            kind: EdgeKind::Contains,
        });
        let mut qualified = vec![self.file_path.clone()];
        qualified.extend(self.scope_names.iter().cloned());
        qualified.push(name.clone());

        self.nodes.push(Node {
            id,
            kind: NodeKind::EnumMember,
            name,
            qualified_name: qualified.join("::"),
            file_path: self.file_path.clone(),
            language: LanguageId::Swift,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility: None,
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: None,
            decorators: None,
        });
    }

    /// `inheritance_specifier` children: the first is `extends` for
    /// classes, `implements` otherwise; the remainder are always
    /// `implements`.
    fn extract_inheritance(&mut self, node: &TsNode, from_id: &str) {
        let mut cursor = node.walk();
        let specifiers: Vec<_> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "inheritance_specifier")
            .collect();
        let is_class = node
            .utf8_text(self.source.as_bytes())
            .unwrap_or("")
            .split_whitespace()
            .next()
            == Some("class");
        for (i, spec) in specifiers.iter().enumerate() {
            let mut inner = spec.walk();
            let Some(user_type) = spec.named_children(&mut inner).find(|c| c.kind() == "user_type") else {
                continue;
            };
            let name = self.text(&user_type);
            if name.is_empty() {
                continue;
            }
            let kind = if i == 0 && is_class { ReferenceKind::Extends } else { ReferenceKind::Implements };
            let (line, column, _, _) = Self::line_col(spec);
            self.unresolved.push(UnresolvedReference {
                from_node_id: from_id.to_string(),
                name,
                kind,
                line,
                column,
            });
        }
    }

    /// Visibility token `fileprivate` maps to `private`; absence means
    /// `internal` (applied by callers via `.or(Some(Internal))`).
    fn visibility_of(&self, node: &TsNode) -> Option<Visibility> {
        let mut cursor = node.walk();
        node.children(&mut cursor).find_map(|c| match c.kind() {
            "visibility_modifier" => {
                let text = self.text(&c);
                match text.as_str() {
                    "public" | "open" => Some(Visibility::Public),
                    "private" | "fileprivate" => Some(Visibility::Private),
                    "internal" => Some(Visibility::Internal),
                    _ => None,
                }
            }
            _ => None,
        })
    }

    fn preceding_attributes(&self, node: &TsNode) -> Vec<String> {
        let mut attributes = Vec::new();
        let mut current = node.prev_named_sibling();
        while let Some(sibling) = current {
            if sibling.kind() == "attribute" {
                attributes.push(self.text(&sibling));
                current = sibling.prev_named_sibling();
            } else {
                break;
            }
        }
        attributes.reverse();
        attributes
    }

    fn walk_calls(&mut self, node: TsNode) {
        if node.kind() == "call_expression" {
            if let Some(name) = call_expression_name(&node, &self.source) {
                let from_id = self.current_scope();
                let (line, column, _, _) = Self::line_col(&node);
                self.unresolved.push(UnresolvedReference {
                    from_node_id: from_id,
                    name,
                    kind: ReferenceKind::Calls,
                    line,
                    column,
                });
            }
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            self.walk_calls(child);
        }
    }

    fn docstring_for(&self, node: &TsNode) -> Option<String> {
        if !self.include_docs {
            return None;
        }
        let mut comments = Vec::new();
        let mut current = node.prev_named_sibling();
        while let Some(sibling) = current {
            if matches!(sibling.kind(), "comment" | "multiline_comment") {
                comments.push(self.text(&sibling));
                current = sibling.prev_named_sibling();
            } else {
                break;
            }
        }
        if comments.is_empty() {
            return None;
        }
        comments.reverse();
        Some(
            comments
                .iter()
                .map(|c| c.trim().trim_start_matches("/**").trim_start_matches("///").trim_start_matches("//").trim_end_matches("*/").trim())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

fn call_expression_name(node: &TsNode, source: &str) -> Option<String> {
    let callee = node.child_by_field_name("function").or_else(|| {
        let mut cursor = node.walk();
        node.named_children(&mut cursor).next()
    })?;
    let text = match callee.kind() {
        "navigation_expression" => callee
            .child_by_field_name("suffix")
            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
            .unwrap_or(""),
        _ => callee.utf8_text(source.as_bytes()).ok()?,
    };
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_swift::LANGUAGE.into()).unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn extension_with_where_clause_names_the_class_node() {
        let source = "extension Array where Element: Equatable { func containsDuplicates() -> Bool { return self.count != Set(self).count } }";
        let tree = parse(source);
        let mut walker = SwiftWalker::new("StringExtensions.swift", source, false, 0);
        walker.walk_root(tree.root_node());

        let class_node = walker.nodes.iter().find(|n| n.kind == NodeKind::Class).expect("class node emitted");
        assert!(class_node.name.starts_with("Array where"));
        assert!(walker.nodes.iter().any(|n| n.name == "containsDuplicates" && n.kind == NodeKind::Method));
    }
}
