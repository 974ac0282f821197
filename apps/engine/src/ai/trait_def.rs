//! AI strategy trait definition.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::cards::EffectCard;
use crate::domain::state::PlayerId;

/// Errors that can occur during AI decision-making.
#[derive(Debug)]
pub enum AiError {
    /// AI failed to make a decision within its time budget
    Timeout,
    /// AI encountered an internal error
    Internal(String),
    /// AI produced or was asked for a move that cannot be legal
    InvalidMove(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Timeout => write!(f, "AI decision timeout"),
            AiError::Internal(msg) => write!(f, "AI internal error: {msg}"),
            AiError::InvalidMove(msg) => write!(f, "AI invalid move: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

/// A concrete move an AI can take at its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AiAction {
    Bid { quantity: u32, face: u8 },
    Challenge,
    ExactClaim,
    PlayCard {
        card: EffectCard,
        target: Option<PlayerId>,
    },
}

/// An action plus the strategy's own estimate of how good it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: AiAction,
    /// In [0, 1]. Interpretation is strategy-specific (win rate for search,
    /// claim probability for the calculating tiers).
    pub confidence: f64,
}

impl Decision {
    pub fn new(action: AiAction, confidence: f64) -> Self {
        Self {
            action,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Trait for AI strategies.
///
/// Implementations receive a [`DecisionContext`](super::DecisionContext) with
/// the redacted table view, opponent models and the probability engine, and
/// must choose a legal action. Strategies are stateless between decisions;
/// anything learned lives in the caller-owned opponent models.
pub trait AiStrategy: Send + Sync {
    /// Choose the next action for the context's viewer.
    fn decide(&self, ctx: &super::DecisionContext<'_>) -> Result<Decision, AiError>;
}
