use thiserror::Error;

use crate::ai::AiError;
use crate::domain::errors::RuleError;
use crate::search::SearchError;

/// Crate-boundary error type.
///
/// Callers embedding the engine should return `Result<T, EngineError>` and
/// convert from the layer-specific errors via the provided `From` impls.
/// Rule violations are recoverable and leave game state untouched; search
/// failures are recovered internally by strategy fallback and only surface
/// here when a caller drives the worker protocol directly.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("rule violation: {0}")]
    Rule(#[from] RuleError),
    #[error("search failure: {0}")]
    Search(#[from] SearchError),
    #[error("AI failure: {0}")]
    Ai(#[from] AiError),
    #[error("internal error: {detail}")]
    Internal { detail: String },
}

impl EngineError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}
