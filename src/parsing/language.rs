//! Language detection and the closed set of supported language tags.
//!
//! Detection is by extension only, case-sensitive on the suffix after the
//! final dot.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// The closed set of language tags this crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
    Python,
    Go,
    Rust,
    Java,
    C,
    Cpp,
    CSharp,
    Php,
    Ruby,
    Swift,
    Kotlin,
    Liquid,
    Unknown,
}

impl LanguageId {
    /// All tags in the closed set, `Unknown` last.
    pub const ALL: &'static [LanguageId] = &[
        LanguageId::TypeScript,
        LanguageId::Tsx,
        LanguageId::JavaScript,
        LanguageId::Jsx,
        LanguageId::Python,
        LanguageId::Go,
        LanguageId::Rust,
        LanguageId::Java,
        LanguageId::C,
        LanguageId::Cpp,
        LanguageId::CSharp,
        LanguageId::Php,
        LanguageId::Ruby,
        LanguageId::Swift,
        LanguageId::Kotlin,
        LanguageId::Liquid,
        LanguageId::Unknown,
    ];

    /// Detect a language tag from a file path's extension.
    ///
    /// Detection is extension-only and case-sensitive on the suffix: a
    /// file with no extension, or an extension outside the table below,
    /// is `Unknown`.
    pub fn from_path(path: &Path) -> LanguageId {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return LanguageId::Unknown;
        };
        Self::from_extension(ext)
    }

    pub fn from_extension(ext: &str) -> LanguageId {
        match ext {
            "ts" => LanguageId::TypeScript,
            "tsx" => LanguageId::Tsx,
            "js" | "mjs" | "cjs" => LanguageId::JavaScript,
            "jsx" => LanguageId::Jsx,
            "py" => LanguageId::Python,
            "go" => LanguageId::Go,
            "rs" => LanguageId::Rust,
            "java" => LanguageId::Java,
            "c" | "h" => LanguageId::C,
            "cpp" | "cc" | "cxx" | "hpp" => LanguageId::Cpp,
            "cs" => LanguageId::CSharp,
            "php" => LanguageId::Php,
            "rb" => LanguageId::Ruby,
            "swift" => LanguageId::Swift,
            "kt" | "kts" => LanguageId::Kotlin,
            "liquid" => LanguageId::Liquid,
            _ => LanguageId::Unknown,
        }
    }

    /// A language is supported iff it has a tree-sitter parser and a
    /// policy (the generic languages and the two bespoke dialects), or is
    /// the pattern-based Liquid extractor.
    pub fn is_supported(&self) -> bool {
        !matches!(self, LanguageId::Unknown)
    }

    /// Config/table key for this language, e.g. for `ExtractConfig::languages`.
    pub fn config_key(&self) -> &'static str {
        match self {
            LanguageId::TypeScript => "typescript",
            LanguageId::Tsx => "tsx",
            LanguageId::JavaScript => "javascript",
            LanguageId::Jsx => "jsx",
            LanguageId::Python => "python",
            LanguageId::Go => "go",
            LanguageId::Rust => "rust",
            LanguageId::Java => "java",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
            LanguageId::CSharp => "csharp",
            LanguageId::Php => "php",
            LanguageId::Ruby => "ruby",
            LanguageId::Swift => "swift",
            LanguageId::Kotlin => "kotlin",
            LanguageId::Liquid => "liquid",
            LanguageId::Unknown => "unknown",
        }
    }

    /// TSX and JSX reuse the TS/JS policy by aliasing rather than getting
    /// their own policy row.
    pub fn policy_alias(&self) -> LanguageId {
        match self {
            LanguageId::Tsx => LanguageId::TypeScript,
            LanguageId::Jsx => LanguageId::JavaScript,
            other => *other,
        }
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.config_key())
    }
}
