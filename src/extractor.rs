//! The public entry point: `Extractor::new` + `extract`.
//!
//! Wires the language registry, parser gateway, policy table, the two
//! bespoke dialect walkers, and the Liquid pattern extractor behind one
//! `(path, bytes) -> ExtractionResult` call. Never returns `Err` from
//! `extract` — every failure mode becomes an entry in
//! `ExtractionResult::errors`.

use std::path::Path;
use std::time::Instant;

use crate::config::ExtractConfig;
use crate::error::ExtractResult;
use crate::model::{ExtractionResult, Severity};
use crate::parsing::kotlin::KotlinWalker;
use crate::parsing::language::LanguageId;
use crate::parsing::liquid;
use crate::parsing::policy::policy_for;
use crate::parsing::swift::SwiftWalker;
use crate::parsing::walker::GenericWalker;
use crate::parsing::ParserGateway;
use crate::utils::get_utc_timestamp_millis;

pub struct Extractor {
    gateway: ParserGateway,
    config: ExtractConfig,
}

impl Extractor {
    /// Build the parser gateway once; a grammar failing to bind aborts
    /// construction with `ExtractError::GrammarInit` rather than surfacing
    /// at extraction time.
    pub fn new(config: ExtractConfig) -> ExtractResult<Self> {
        let gateway = ParserGateway::new()?;
        Ok(Self { gateway, config })
    }

    /// Extract one `(path, bytes)` pair. `language` overrides detection
    /// from the path's extension when the caller already knows the tag.
    pub fn extract(&self, path: &Path, source: &[u8], language: Option<LanguageId>) -> ExtractionResult {
        let started = Instant::now();
        let file_path = path.to_string_lossy().into_owned();
        let tag = language.unwrap_or_else(|| LanguageId::from_path(path));

        let _span = tracing::debug_span!("extract", file = %file_path, language = %tag).entered();

        if !tag.is_supported() {
            tracing::warn!(file = %file_path, "unsupported language");
            return finish(
                ExtractionResult::with_error(format!("unsupported language for '{file_path}'"), Severity::Error),
                started,
            );
        }
        if !self.config.is_language_enabled(tag.config_key()) {
            return finish(
                ExtractionResult::with_error(format!("language '{tag}' disabled by configuration"), Severity::Error),
                started,
            );
        }
        if source.len() as u64 > self.config.max_file_size_bytes {
            tracing::warn!(file = %file_path, bytes = source.len(), "file exceeds max_file_size_bytes, skipping");
            return finish(
                ExtractionResult::with_error(
                    format!("'{file_path}' exceeds configured max_file_size_bytes"),
                    Severity::Warning,
                ),
                started,
            );
        }

        let Ok(text) = std::str::from_utf8(source) else {
            return finish(
                ExtractionResult::with_error(format!("'{file_path}' is not valid UTF-8"), Severity::Error),
                started,
            );
        };

        let updated_at = get_utc_timestamp_millis();
        let include_docs = self.config.include_docs;

        let result = match tag.policy_alias() {
            LanguageId::Liquid => {
                let (nodes, edges, unresolved_references) = liquid::extract(&file_path, text, updated_at);
                ExtractionResult {
                    nodes,
                    edges,
                    unresolved_references,
                    errors: Vec::new(),
                    duration_ms: 0,
                }
            }
            LanguageId::Kotlin => {
                let Some(tree) = self.gateway.parse(tag, text) else {
                    return finish(parse_failure(&file_path), started);
                };
                let mut walker = KotlinWalker::new(file_path.clone(), text, include_docs, updated_at);
                walker.walk_root(tree.root_node());
                ExtractionResult {
                    nodes: walker.nodes,
                    edges: walker.edges,
                    unresolved_references: walker.unresolved,
                    errors: Vec::new(),
                    duration_ms: 0,
                }
            }
            LanguageId::Swift => {
                let Some(tree) = self.gateway.parse(tag, text) else {
                    return finish(parse_failure(&file_path), started);
                };
                let mut walker = SwiftWalker::new(file_path.clone(), text, include_docs, updated_at);
                walker.walk_root(tree.root_node());
                ExtractionResult {
                    nodes: walker.nodes,
                    edges: walker.edges,
                    unresolved_references: walker.unresolved,
                    errors: Vec::new(),
                    duration_ms: 0,
                }
            }
            generic_tag => {
                let Some(policy) = policy_for(generic_tag) else {
                    return finish(
                        ExtractionResult::with_error(format!("no policy for language '{generic_tag}'"), Severity::Error),
                        started,
                    );
                };
                let Some(tree) = self.gateway.parse(generic_tag, text) else {
                    return finish(parse_failure(&file_path), started);
                };
                let mut walker = GenericWalker::new(&policy, generic_tag, file_path.clone(), text, include_docs, updated_at);
                walker.walk_root(tree.root_node());
                ExtractionResult {
                    nodes: walker.nodes,
                    edges: walker.edges,
                    unresolved_references: walker.unresolved,
                    errors: Vec::new(),
                    duration_ms: 0,
                }
            }
        };

        tracing::debug!(
            file = %file_path,
            nodes = result.nodes.len(),
            edges = result.edges.len(),
            "extraction complete"
        );
        finish(result, started)
    }
}

fn parse_failure(file_path: &str) -> ExtractionResult {
    tracing::warn!(file = %file_path, "parse failure");
    ExtractionResult::with_error(format!("failed to parse '{file_path}'"), Severity::Error)
}

fn finish(mut result: ExtractionResult, started: Instant) -> ExtractionResult {
    result.duration_ms = started.elapsed().as_millis() as u64;
    result
}
