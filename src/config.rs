//! Configuration for the extraction subsystem.
//!
//! Layered the way the rest of the corpus does it: defaults, then a TOML
//! file, then environment variables, via `figment`.
//!
//! # Environment Variables
//!
//! Environment variables are prefixed with `CODEGRAPH_` and use a double
//! underscore to separate nested levels:
//! - `CODEGRAPH_EXTRACT__MAX_FILE_SIZE_BYTES=2000000`
//! - `CODEGRAPH_LOGGING__DEFAULT=debug`

use std::collections::HashMap;
use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExtractConfig {
    /// Per-language enable flags, keyed by the language tag
    /// (`"rust"`, `"typescript"`, ...). A language absent from this map is
    /// enabled by default; an explicit `false` disables it.
    #[serde(default)]
    pub languages: HashMap<String, bool>,

    /// Collect docstrings during extraction. Off by default, since most
    /// callers only need the signature and location for graph traversal.
    #[serde(default = "default_false")]
    pub include_docs: bool,

    /// Files larger than this are skipped with an `UnsupportedLanguage`-style
    /// warning rather than handed to the parser, bounding worst-case parse
    /// time on generated/vendored files.
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for the `EnvFilter` when `RUST_LOG` isn't set.
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module level overrides, e.g. `{"walker": "debug"}`.
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_false() -> bool {
    false
}

fn default_max_file_size() -> u64 {
    2 * 1024 * 1024
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            languages: HashMap::new(),
            include_docs: default_false(),
            max_file_size_bytes: default_max_file_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extract: ExtractConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ExtractConfig {
    /// `false` only when the language is explicitly disabled in config;
    /// an absent entry means "enabled". Detection and enablement are
    /// separate questions.
    pub fn is_language_enabled(&self, tag: &str) -> bool {
        self.languages.get(tag).copied().unwrap_or(true)
    }
}

impl Settings {
    /// Load configuration from defaults, an optional TOML file, then
    /// environment variables, in that precedence order. A malformed TOML
    /// file or an environment value that doesn't fit its field's type
    /// surfaces as `ExtractError::ConfigError` rather than a bare
    /// `figment::Error`, so callers only ever match one error type.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> ExtractResult<Self> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(
                Env::prefixed("CODEGRAPH_")
                    .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
            )
            .extract()
            .map_err(|source| ExtractError::ConfigError { reason: source.to_string() })
    }

    /// Load configuration from defaults and environment variables only,
    /// looking for `codegraph.toml` in the current directory if present.
    pub fn load() -> ExtractResult<Self> {
        Self::load_from(PathBuf::from("codegraph.toml"))
    }
}
