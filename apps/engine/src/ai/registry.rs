//! How to register your AI
//!
//! 1) Implement `AiStrategy` for your type in its module.
//! 2) Add a new `AiFactory` entry to the static list with stable `name` and `version`.
//! 3) Keep ordering stable; avoid side effects in constructors.
//! 4) Determinism: same seed ⇒ same behavior (where applicable).

use crate::ai::{AiDifficulty, AiStrategy, Heuristic, RandomPlayer, Reckoner, Strategic};

/// Factory definition for constructing AI implementations.
pub struct AiFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub difficulty: AiDifficulty,
    pub make: fn(seed: Option<u64>) -> Box<dyn AiStrategy>,
}

static AI_FACTORIES: &[AiFactory] = &[
    AiFactory {
        name: RandomPlayer::NAME,
        version: RandomPlayer::VERSION,
        difficulty: AiDifficulty::Easy,
        make: make_random_player,
    },
    AiFactory {
        name: Heuristic::NAME,
        version: Heuristic::VERSION,
        difficulty: AiDifficulty::Normal,
        make: make_heuristic,
    },
    AiFactory {
        name: Reckoner::NAME,
        version: Reckoner::VERSION,
        difficulty: AiDifficulty::Hard,
        make: make_reckoner,
    },
    AiFactory {
        name: Strategic::NAME,
        version: Strategic::VERSION,
        difficulty: AiDifficulty::Expert,
        make: make_strategic,
    },
];

/// Returns the statically registered AI factories.
pub fn registered_ais() -> &'static [AiFactory] {
    AI_FACTORIES
}

/// Finds a registered AI factory by its name.
pub fn by_name(name: &str) -> Option<&'static AiFactory> {
    registered_ais().iter().find(|factory| factory.name == name)
}

/// Finds the factory registered for a difficulty tier.
pub fn by_difficulty(difficulty: AiDifficulty) -> Option<&'static AiFactory> {
    registered_ais()
        .iter()
        .find(|factory| factory.difficulty == difficulty)
}

fn make_random_player(seed: Option<u64>) -> Box<dyn AiStrategy> {
    Box::new(RandomPlayer::new(seed))
}

fn make_heuristic(seed: Option<u64>) -> Box<dyn AiStrategy> {
    Box::new(Heuristic::new(seed))
}

fn make_reckoner(seed: Option<u64>) -> Box<dyn AiStrategy> {
    Box::new(Reckoner::new(seed))
}

fn make_strategic(seed: Option<u64>) -> Box<dyn AiStrategy> {
    Box::new(Strategic::new(seed))
}
