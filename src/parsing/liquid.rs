//! The Liquid pattern extractor.
//!
//! Liquid has no supported parser in this crate, so extraction runs over
//! raw text with a handful of regexes instead of a CST walk. It still
//! produces the same node/edge/reference shape as every other language.

use std::sync::OnceLock;

use regex::Regex;

use crate::identity;
use crate::model::{Edge, Node, UnresolvedReference};
use crate::parsing::language::LanguageId;
use crate::types::{EdgeKind, NodeKind, ReferenceKind};

fn render_include_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\{%-?\s*(?:render|include)\s+'([^']+)'"#).unwrap())
}

fn section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\{%-?\s*section\s+'([^']+)'"#).unwrap())
}

fn schema_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{%-?\s*schema\s*-?%\}(.*?)\{%-?\s*endschema\s*-?%\}").unwrap())
}

fn assign_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{%-?\s*assign\s+([A-Za-z_][A-Za-z0-9_]*)\s*=").unwrap())
}

/// 1-based line number of the byte offset `pos` within `source`.
fn line_of(source: &str, pos: usize) -> u32 {
    source[..pos.min(source.len())].matches('\n').count() as u32 + 1
}

pub fn extract(file_path: &str, source: &str, updated_at: u64) -> (Vec<Node>, Vec<Edge>, Vec<UnresolvedReference>) {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut unresolved = Vec::new();

    let file_id = identity::node_id(file_path, NodeKind::File, file_path, 1);
    let line_count = source.matches('\n').count() as u32 + 1;
    nodes.push(Node {
        id: file_id.clone(),
        kind: NodeKind::File,
        name: file_path.to_string(),
        qualified_name: file_path.to_string(),
        file_path: file_path.to_string(),
        language: LanguageId::Liquid,
        start_line: 1,
        end_line: line_count,
        start_column: 0,
        end_column: 0,
        updated_at,
        visibility: None,
        is_exported: None,
        is_async: None,
        is_static: None,
        is_abstract: None,
        signature: None,
        docstring: None,
        decorators: None,
    });

    for caps in render_include_re().captures_iter(source) {
        let whole = caps.get(0).unwrap();
        let name = caps[1].to_string();
        let line = line_of(source, whole.start());
        emit_component(&mut nodes, &mut edges, &mut unresolved, file_path, &file_id, &name, line, updated_at, "snippets");
    }

    for caps in section_re().captures_iter(source) {
        let whole = caps.get(0).unwrap();
        let name = caps[1].to_string();
        let line = line_of(source, whole.start());
        emit_component(&mut nodes, &mut edges, &mut unresolved, file_path, &file_id, &name, line, updated_at, "sections");
    }

    for caps in schema_re().captures_iter(source) {
        let whole = caps.get(0).unwrap();
        let body = caps[1].trim();
        let line = line_of(source, whole.start());
        let name = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("name").and_then(|n| n.as_str()).map(|s| s.to_string()))
            .unwrap_or_else(|| "schema".to_string());
        let id = identity::node_id(file_path, NodeKind::Constant, &name, line);
        nodes.push(Node {
            id: id.clone(),
            kind: NodeKind::Constant,
            name,
            qualified_name: format!("{file_path}::schema"),
            file_path: file_path.to_string(),
            language: LanguageId::Liquid,
            start_line: line,
            end_line: line,
            start_column: 0,
            end_column: 0,
            updated_at,
            visibility: None,
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: Some(body.chars().take(200).collect()),
            decorators: None,
        });
        edges.push(Edge {
            source: file_id.clone(),
            target: id,
            kind: EdgeKind::Contains,
        });
    }

    for caps in assign_re().captures_iter(source) {
        let whole = caps.get(0).unwrap();
        let name = caps[1].to_string();
        let line = line_of(source, whole.start());
        let id = identity::node_id(file_path, NodeKind::Variable, &name, line);
        nodes.push(Node {
            id: id.clone(),
            kind: NodeKind::Variable,
            name: name.clone(),
            qualified_name: format!("{file_path}::{name}"),
            file_path: file_path.to_string(),
            language: LanguageId::Liquid,
            start_line: line,
            end_line: line,
            start_column: 0,
            end_column: 0,
            updated_at,
            visibility: None,
            is_exported: None,
            is_async: None,
            is_static: None,
            is_abstract: None,
            signature: None,
            docstring: None,
            decorators: None,
        });
        edges.push(Edge {
            source: file_id.clone(),
            target: id,
            kind: EdgeKind::Contains,
        });
    }

    (nodes, edges, unresolved)
}

#[allow(clippy::too_many_arguments)]
fn emit_component(
    nodes: &mut Vec<Node>,
    edges: &mut Vec<Edge>,
    unresolved: &mut Vec<UnresolvedReference>,
    file_path: &str,
    file_id: &str,
    name: &str,
    line: u32,
    updated_at: u64,
    directory: &str,
) {
    let id = identity::node_id(file_path, NodeKind::Component, name, line);
    nodes.push(Node {
        id: id.clone(),
        kind: NodeKind::Component,
        name: name.to_string(),
        qualified_name: format!("{file_path}::{name}"),
        file_path: file_path.to_string(),
        language: LanguageId::Liquid,
        start_line: line,
        end_line: line,
        start_column: 0,
        end_column: 0,
        updated_at,
        visibility: None,
        is_exported: None,
        is_async: None,
        is_static: None,
        is_abstract: None,
        signature: None,
        docstring: None,
        decorators: None,
    });
    edges.push(Edge {
        source: file_id.to_string(),
        target: id.clone(),
        kind: EdgeKind::Contains,
    });
    unresolved.push(UnresolvedReference {
        from_node_id: id,
        name: format!("{directory}/{name}.liquid"),
        kind: ReferenceKind::References,
        line,
        column: 0,
    });
}
