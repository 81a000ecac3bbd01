//! The node/edge/reference shape that leaves the extraction boundary.
//!
//! Everything here is plain data: constructed by the walkers in
//! `crate::parsing`, consumed by a downstream sink this crate does not
//! implement.

use serde::{Deserialize, Serialize};

use crate::parsing::LanguageId;
use crate::types::{EdgeKind, NodeKind, Range, ReferenceKind, Visibility};

/// A file tracked by the extractor. Distinct from a `file` kind `Node` —
/// this is bookkeeping metadata (content hash, line count) used for
/// incremental sync; the `file` node is an emitted graph entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub language: LanguageId,
    pub content_hash: String,
    pub line_count: u32,
}

/// A typed symbol emitted during extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    pub qualified_name: String,
    pub file_path: String,
    pub language: LanguageId,
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: u32,
    pub end_column: u32,
    /// Extraction wall-clock time in milliseconds.
    pub updated_at: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_exported: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decorators: Option<Vec<String>>,
}

impl Node {
    pub fn range(&self) -> Range {
        Range::new(
            self.start_line,
            self.start_column,
            self.end_line,
            self.end_column,
        )
    }
}

/// An edge between two node ids emitted in the same extraction batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// A by-name link to a symbol that a downstream linking pass will resolve
/// against the global graph. Resolving these is out of scope here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReference {
    pub from_node_id: String,
    pub name: String,
    pub kind: ReferenceKind,
    pub line: u32,
    pub column: u32,
}

/// Sentinel `fromNodeId` for references attributed to file scope rather
/// than an enclosing symbol (top-level imports, calls made at module
/// level).
pub const FILE_SCOPE_SENTINEL: &str = "<file>";

/// Severity of an entry in `ExtractionResult::errors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One recorded error or warning from an extraction run. Never causes the
/// extractor to return `Err` — see `crate::error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionIssue {
    pub message: String,
    pub severity: Severity,
}

/// The complete output of extracting one `(path, bytes)` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub unresolved_references: Vec<UnresolvedReference>,
    pub errors: Vec<ExtractionIssue>,
    pub duration_ms: u64,
}

impl ExtractionResult {
    pub fn with_error(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            errors: vec![ExtractionIssue {
                message: message.into(),
                severity,
            }],
            ..Default::default()
        }
    }
}
