//! Parser gateway: one warm tree-sitter parser per language, reused
//! across files.
//!
//! Each parser lives behind a `parking_lot::Mutex` so multiple worker
//! threads can extract different files of the same language without
//! contention beyond the `parse()` call itself. A parser holds no state
//! about a prior file once `parse()` returns; the walker that consumes
//! the resulting tree owns all per-file state.

use std::collections::HashMap;

use parking_lot::Mutex;
use tree_sitter::{Language, Parser, Tree};

use crate::error::{ExtractError, ExtractResult};
use crate::parsing::language::LanguageId;

fn grammar_for(tag: LanguageId) -> Option<Language> {
    match tag {
        LanguageId::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        LanguageId::Tsx => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
        LanguageId::JavaScript | LanguageId::Jsx => Some(tree_sitter_javascript::LANGUAGE.into()),
        LanguageId::Python => Some(tree_sitter_python::LANGUAGE.into()),
        LanguageId::Go => Some(tree_sitter_go::LANGUAGE.into()),
        LanguageId::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
        LanguageId::Java => Some(tree_sitter_java::LANGUAGE.into()),
        LanguageId::C => Some(tree_sitter_c::LANGUAGE.into()),
        LanguageId::Cpp => Some(tree_sitter_cpp::LANGUAGE.into()),
        LanguageId::CSharp => Some(tree_sitter_c_sharp::LANGUAGE.into()),
        LanguageId::Php => Some(tree_sitter_php::LANGUAGE_PHP.into()),
        LanguageId::Ruby => Some(tree_sitter_ruby::LANGUAGE.into()),
        LanguageId::Swift => Some(tree_sitter_swift::LANGUAGE.into()),
        LanguageId::Kotlin => Some(tree_sitter_kotlin_ng::LANGUAGE.into()),
        LanguageId::Liquid | LanguageId::Unknown => None,
    }
}

/// Holds one `Parser` per language tag that has a tree-sitter grammar.
/// Liquid and `Unknown` are not backed by a grammar and never appear
/// here; the extractor routes them elsewhere.
pub struct ParserGateway {
    parsers: HashMap<LanguageId, Mutex<Parser>>,
}

impl ParserGateway {
    /// Build parsers for every grammar-backed language up front, so a
    /// mis-set grammar fails fast at construction instead of on first use.
    pub fn new() -> ExtractResult<Self> {
        let mut parsers = HashMap::new();
        for &tag in LanguageId::ALL {
            let aliased = tag.policy_alias();
            if parsers.contains_key(&aliased) {
                continue;
            }
            let Some(language) = grammar_for(aliased) else {
                continue;
            };
            let mut parser = Parser::new();
            parser
                .set_language(&language)
                .map_err(|e| ExtractError::GrammarInit {
                    language: aliased.to_string(),
                    reason: e.to_string(),
                })?;
            parsers.insert(aliased, Mutex::new(parser));
        }
        Ok(Self { parsers })
    }

    /// Parse UTF-8 source for the given language. Returns `None` if the
    /// language has no grammar (Liquid, Unknown) or the parser produced no
    /// tree — both are reported as parse failures by the caller, never a
    /// panic. A parse must never crash the extractor.
    pub fn parse(&self, tag: LanguageId, source: &str) -> Option<Tree> {
        let parser_lock = self.parsers.get(&tag.policy_alias())?;
        let mut parser = parser_lock.lock();
        parser.parse(source, None)
    }

    pub fn supports_grammar(&self, tag: LanguageId) -> bool {
        self.parsers.contains_key(&tag.policy_alias())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_builds_for_all_grammar_languages() {
        let gateway = ParserGateway::new().expect("gateway should initialize");
        assert!(gateway.supports_grammar(LanguageId::Rust));
        assert!(gateway.supports_grammar(LanguageId::Tsx));
        assert!(gateway.supports_grammar(LanguageId::Kotlin));
        assert!(!gateway.supports_grammar(LanguageId::Liquid));
        assert!(!gateway.supports_grammar(LanguageId::Unknown));
    }

    #[test]
    fn parse_rust_produces_a_tree() {
        let gateway = ParserGateway::new().unwrap();
        let tree = gateway.parse(LanguageId::Rust, "fn main() {}");
        assert!(tree.is_some());
        assert_eq!(tree.unwrap().root_node().kind(), "source_file");
    }

    #[test]
    fn tsx_and_jsx_alias_to_shared_parsers() {
        let gateway = ParserGateway::new().unwrap();
        assert!(gateway.parse(LanguageId::Tsx, "const x: number = 1;").is_some());
        assert!(gateway.parse(LanguageId::Jsx, "const x = 1;").is_some());
    }
}
