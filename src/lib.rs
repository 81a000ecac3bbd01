//! Multi-language source extraction: parse each file to a concrete syntax
//! tree, walk it with a language-specific policy, and emit typed nodes,
//! edges, and unresolved references for a downstream graph store to
//! consume.

pub mod config;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod logging;
pub mod model;
pub mod parsing;
pub mod types;
pub mod utils;

pub use config::{ExtractConfig, LoggingConfig, Settings};
pub use error::{ExtractError, ExtractResult};
pub use extractor::Extractor;
pub use model::{Edge, ExtractionIssue, ExtractionResult, FileRecord, Node, Severity, UnresolvedReference};
pub use parsing::LanguageId;
pub use types::{EdgeKind, NodeKind, Range, ReferenceKind, Visibility};
