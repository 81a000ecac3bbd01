//! The Kotlin bespoke walker.
//!
//! Kotlin overloads `class_declaration` across class/interface/enum and
//! needs modifier-bag inspection the generic policy table has no slot
//! for, so it gets its own walker rather than a `PolicyRecord` entry
//! (`crate::parsing::policy` has no Kotlin row, by design).

use tree_sitter::Node as TsNode;

use crate::identity;
use crate::model::{Edge, Node, UnresolvedReference, FILE_SCOPE_SENTINEL};
use crate::parsing::language::LanguageId;
use crate::types::{EdgeKind, NodeKind, ReferenceKind, Visibility};

pub struct KotlinWalker {
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

impl KotlinWalker {
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

    fn modifiers_text(node: &TsNode, source: &str) -> Option<String> {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .find(|c| c.kind() == "modifiers")
            .and_then(|c| c.utf8_text(source.as_bytes()).ok())
            .map(|s| s.to_string())
    }

    fn has_bare_child_token(node: &TsNode, source: &str, token: &str) -> bool {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .any(|c| c.kind() != "modifiers" && c.utf8_text(source.as_bytes()).unwrap_or("") == token)
    }

    /// A `delegation_specifier` is either a bare `user_type` (plain
    /// interface name) or a `constructor_invocation` wrapping one (a
    /// delegated supertype constructor call, e.g. `Result()`). Either way
    /// the reference should name the type, not the call syntax around it.
    fn delegation_type_name(spec: &TsNode, source: &str) -> Option<String> {
        fn find_user_type(node: &TsNode) -> Option<TsNode> {
            if node.kind() == "user_type" {
                return Some(*node);
            }
            let mut cursor = node.walk();
            node.named_children(&mut cursor).find_map(|c| find_user_type(&c))
        }
        let user_type = find_user_type(spec)?;
        let text = user_type.utf8_text(source.as_bytes()).ok()?;
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    fn dispatch(&mut self, node: TsNode) {
        match node.kind() {
            "class_declaration" => self.handle_class_declaration(node),
            "object_declaration" => self.emit_class_like(node, NodeKind::Class, "<anonymous>"),
            "companion_object" => self.handle_companion_object(node),
            "function_declaration" => self.handle_function(node),
            "property_declaration" => self.handle_property(node),
            "type_alias" => self.handle_type_alias(node),
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

    fn recurse_body(&mut self, node: TsNode) {
        if let Some(body) = node
            .child_by_field_name("body")
            .or_else(|| node.child_by_field_name("class_body"))
        {
            self.recurse(body);
        }
    }

    fn name_of(&self, node: &TsNode) -> Option<String> {
        let candidate = node
            .child_by_field_name("name")
            .or_else(|| {
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

    /// `class_declaration` is overloaded across class/interface/enum,
    /// distinguished by a bare `interface`/`enum` child token outside
    /// `modifiers`.
    fn handle_class_declaration(&mut self, node: TsNode) {
        let is_interface = Self::has_bare_child_token(&node, &self.source, "interface");
        let is_enum = Self::has_bare_child_token(&node, &self.source, "enum");
        let kind = if is_interface {
            NodeKind::Interface
        } else if is_enum {
            NodeKind::Enum
        } else {
            NodeKind::Class
        };
        self.emit_class_like(node, kind, "<anonymous>");
    }

    fn emit_class_like(&mut self, node: TsNode, kind: NodeKind, default_name: &str) {
        let Some(name) = self.name_of(&node).or_else(|| {
            if default_name == "<anonymous>" {
                None
            } else {
                Some(default_name.to_string())
            }
        }) else {
            return;
        };
        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, kind, &name, start_line);
        self.edges.push(Edge {
            source: self.current_scope(),
            target: id.clone(),
            kind: EdgeKind::Contains,
        });

        let modifiers = Self::modifiers_text(&node, &self.source).unwrap_or_default();
        let is_abstract = Some(modifiers.split_whitespace().any(|w| w == "abstract"));
        let visibility = visibility_from_modifiers(&modifiers).or(Some(Visibility::Public));

        self.extract_delegation_specifiers(&node, &id);

        let mut qualified = vec![self.file_path.clone()];
        qualified.extend(self.scope_names.iter().cloned());
        qualified.push(name.clone());

        self.nodes.push(Node {
            id: id.clone(),
            kind,
            name: name.clone(),
            qualified_name: qualified.join("::"),
            file_path: self.file_path.clone(),
            language: LanguageId::Kotlin,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility,
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract,
            signature: None,
            docstring: self.docstring_for(&node),
            decorators: None,
        });

        self.scope_ids.push(id);
        self.scope_names.push(name);
        self.recurse_body(node);
        self.scope_ids.pop();
        self.scope_names.pop();
    }

    fn handle_companion_object(&mut self, node: TsNode) {
        let name = self.name_of(&node).unwrap_or_else(|| "Companion".to_string());
        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, NodeKind::Class, &name, start_line);
        self.edges.push(Edge {
            source: self.current_scope(),
            target: id.clone(),
            kind: EdgeKind::Contains,
        });
        let mut qualified = vec![self.file_path.clone()];
        qualified.extend(self.scope_names.iter().cloned());
        qualified.push(name.clone());

        self.nodes.push(Node {
            id: id.clone(),
            kind: NodeKind::Class,
            name: name.clone(),
            qualified_name: qualified.join("::"),
            file_path: self.file_path.clone(),
            language: LanguageId::Kotlin,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility: Some(Visibility::Public),
            is_exported: None,
            is_async: None,
            is_static: Some(true),
            is_abstract: None,
            signature: None,
            docstring: self.docstring_for(&node),
            decorators: None,
        });

        self.scope_ids.push(id);
        self.scope_names.push(name);
        self.recurse_body(node);
        self.scope_ids.pop();
        self.scope_names.pop();
    }

    fn handle_function(&mut self, node: TsNode) {
        let Some(name) = self.name_of(&node) else { return };
        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let kind = if self.scope_ids.is_empty() {
            NodeKind::Function
        } else {
            NodeKind::Method
        };
        let id = identity::node_id(&self.file_path, kind, &name, start_line);
        self.edges.push(Edge {
            source: self.current_scope(),
            target: id.clone(),
            kind: EdgeKind::Contains,
        });

        let modifiers = Self::modifiers_text(&node, &self.source).unwrap_or_default();
        let is_async = modifiers.split_whitespace().any(|w| w == "suspend");
        let visibility = visibility_from_modifiers(&modifiers).or(Some(Visibility::Public));

        let signature = node.child_by_field_name("parameters").map(|p| {
            let params_text = self.text(&p);
            match node.child_by_field_name("return_type") {
                Some(ret) => format!("{params_text}: {}", self.text(&ret)),
                None => params_text,
            }
        });

        let mut qualified = vec![self.file_path.clone()];
        qualified.extend(self.scope_names.iter().cloned());
        qualified.push(name.clone());

        self.nodes.push(Node {
            id,
            kind,
            name: name.clone(),
            qualified_name: qualified.join("::"),
            file_path: self.file_path.clone(),
            language: LanguageId::Kotlin,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility,
            is_exported: None,
            is_async: Some(is_async),
            is_static: None,
            is_abstract: None,
            signature,
            docstring: self.docstring_for(&node),
            decorators: None,
        });

        if let Some(body) = node.child_by_field_name("body") {
            self.walk_calls(body);
        }
    }

    fn handle_property(&mut self, node: TsNode) {
        let modifiers = Self::modifiers_text(&node, &self.source).unwrap_or_default();
        let is_const = modifiers.split_whitespace().any(|w| w == "const");
        let kind = if is_const { NodeKind::Constant } else { NodeKind::Property };

        let Some(name_node) = node
            .child_by_field_name("variable")
            .or_else(|| {
                let mut cursor = node.walk();
                node.named_children(&mut cursor).find(|c| c.kind() == "variable_declaration")
            })
            .and_then(|decl| {
                let mut cursor = decl.walk();
                decl.named_children(&mut cursor).find(|c| c.kind() == "simple_identifier")
            })
        else {
            self.recurse(node);
            return;
        };
        let name = self.text(&name_node);
        if name.is_empty() {
            return;
        }

        let (start_line, start_column, end_line, end_column) = Self::line_col(&node);
        let id = identity::node_id(&self.file_path, kind, &name, start_line);
        self.edges.push(Edge {
            source: self.current_scope(),
            target: id.clone(),
            kind: EdgeKind::Contains,
        });

        let visibility = visibility_from_modifiers(&modifiers).or(Some(Visibility::Public));
        let mut qualified = vec![self.file_path.clone()];
        qualified.extend(self.scope_names.iter().cloned());
        qualified.push(name.clone());

        self.nodes.push(Node {
            id,
            kind,
            name,
            qualified_name: qualified.join("::"),
            file_path: self.file_path.clone(),
            language: LanguageId::Kotlin,
            start_line,
            end_line,
            start_column,
            end_column,
            updated_at: self.updated_at,
            visibility,
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: self.docstring_for(&node),
            decorators: None,
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
            language: LanguageId::Kotlin,
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
        let Some(name) = self.name_of(&node) else { return };
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
            language: LanguageId::Kotlin,
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

    /// `delegation_specifier` children: a specifier containing a
    /// `constructor_invocation` is `extends` for the first such, and
    /// `implements` for the rest; a plain `user_type` specifier is always
    /// `implements`.
    fn extract_delegation_specifiers(&mut self, node: &TsNode, from_id: &str) {
        let mut cursor = node.walk();
        let specifiers: Vec<_> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "delegation_specifier")
            .collect();
        let mut extends_emitted = false;
        for spec in specifiers {
            let mut inner = spec.walk();
            let has_invocation = spec
                .named_children(&mut inner)
                .any(|c| c.kind() == "constructor_invocation");
            let Some(name) = Self::delegation_type_name(&spec, &self.source) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let kind = if has_invocation && !extends_emitted {
                extends_emitted = true;
                ReferenceKind::Extends
            } else {
                ReferenceKind::Implements
            };
            let (line, column, _, _) = Self::line_col(&spec);
            self.unresolved.push(UnresolvedReference {
                from_node_id: from_id.to_string(),
                name,
                kind,
                line,
                column,
            });
        }
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
            if matches!(sibling.kind(), "comment" | "multiline_comment" | "line_comment") {
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
                .map(|c| c.trim().trim_start_matches("/**").trim_start_matches("//").trim_end_matches("*/").trim())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

fn visibility_from_modifiers(modifiers: &str) -> Option<Visibility> {
    for word in modifiers.split_whitespace() {
        match word {
            "public" => return Some(Visibility::Public),
            "private" => return Some(Visibility::Private),
            "protected" => return Some(Visibility::Protected),
            "internal" => return Some(Visibility::Internal),
            _ => {}
        }
    }
    None
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
