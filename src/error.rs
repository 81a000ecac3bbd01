//! Error types for the extraction subsystem.
//!
//! `ExtractError` covers conditions that prevent `Extractor` itself from
//! being constructed (a grammar failing to bind, an invalid config value).
//! It is distinct from the per-file issues carried in
//! `ExtractionResult::errors` (`crate::model::ExtractionIssue`): those are
//! recoverable by design and never surface as a `Result::Err` — the
//! extractor never throws across its boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to initialize {language} grammar: {reason}")]
    GrammarInit { language: String, reason: String },

    #[error("invalid configuration: {reason}")]
    ConfigError { reason: String },
}

pub type ExtractResult<T> = Result<T, ExtractError>;
