//! AI strategy module - automated seat decisions.
//!
//! This module provides:
//! - The `AiStrategy` trait and the `DecisionContext` it consumes
//! - Four tiers: RandomPlayer (Easy), Heuristic (Normal), Reckoner (Hard)
//!   and Strategic (Expert, search-backed)
//! - A static factory registry keyed by name and difficulty

mod context;
mod heuristic;
mod random;
mod reckoner;
pub mod registry;
mod strategic;
mod trait_def;

use serde::{Deserialize, Serialize};

pub use context::DecisionContext;
pub use heuristic::Heuristic;
pub use random::RandomPlayer;
pub use reckoner::Reckoner;
pub use strategic::Strategic;
pub use trait_def::{AiAction, AiError, AiStrategy, Decision};

/// Difficulty tiers exposed to game setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiDifficulty {
    Easy,
    Normal,
    Hard,
    Expert,
}

/// Create an AI strategy for a difficulty tier.
///
/// `Some(seed)` gives reproducible behavior where the tier is randomized;
/// deterministic tiers ignore it.
pub fn create_ai(difficulty: AiDifficulty, seed: Option<u64>) -> Box<dyn AiStrategy> {
    match difficulty {
        AiDifficulty::Easy => Box::new(RandomPlayer::new(seed)),
        AiDifficulty::Normal => Box::new(Heuristic::new(seed)),
        AiDifficulty::Hard => Box::new(Reckoner::new(seed)),
        AiDifficulty::Expert => Box::new(Strategic::new(seed)),
    }
}
