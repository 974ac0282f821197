use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Recoverable rule violations.
///
/// Every variant is local to the acting caller: a failed operation does not
/// mutate [`crate::domain::state::GameState`] and is never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    NotYourTurn,
    PhaseMismatch { expected: &'static str },
    NotEnoughPlayers,
    TooManyPlayers,
    IllegalRaise { quantity: u32, face: u8 },
    InvalidFace(u8),
    InvalidQuantity(u32),
    NoCurrentBid,
    NoSuchBid,
    CardNotHeld,
    EffectNotActive,
    TargetRequired,
    UnknownPlayer(u8),
    Eliminated(u8),
    NotPaused,
    Other(String),
}

impl Display for RuleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RuleError::NotYourTurn => write!(f, "not your turn"),
            RuleError::PhaseMismatch { expected } => {
                write!(f, "phase mismatch: expected {expected}")
            }
            RuleError::NotEnoughPlayers => write!(f, "at least two players required"),
            RuleError::TooManyPlayers => write!(f, "table is full"),
            RuleError::IllegalRaise { quantity, face } => {
                write!(f, "illegal raise: {quantity} x face {face}")
            }
            RuleError::InvalidFace(face) => write!(f, "invalid face value: {face}"),
            RuleError::InvalidQuantity(q) => write!(f, "invalid quantity: {q}"),
            RuleError::NoCurrentBid => write!(f, "no bid to challenge"),
            RuleError::NoSuchBid => write!(f, "no such bid in the log"),
            RuleError::CardNotHeld => write!(f, "card not held"),
            RuleError::EffectNotActive => write!(f, "effect not active"),
            RuleError::TargetRequired => write!(f, "card requires a target player"),
            RuleError::UnknownPlayer(id) => write!(f, "unknown player: {id}"),
            RuleError::Eliminated(id) => write!(f, "player {id} is eliminated"),
            RuleError::NotPaused => write!(f, "game is not paused"),
            RuleError::Other(s) => write!(f, "rule error: {s}"),
        }
    }
}

impl Error for RuleError {}

impl RuleError {
    pub fn other(detail: impl Into<String>) -> Self {
        Self::Other(detail.into())
    }
}
