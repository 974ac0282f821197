//! Shared CLI types for the simulator.

use clap::ValueEnum;
use engine::ai::AiDifficulty;
use engine::domain::state::GameMode;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Jsonl,
    Json,
}

/// AI tier for one seat; maps onto the engine's difficulty registry.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AiType {
    Random,
    Heuristic,
    Reckoner,
    Strategic,
}

impl AiType {
    pub fn difficulty(self) -> AiDifficulty {
        match self {
            AiType::Random => AiDifficulty::Easy,
            AiType::Heuristic => AiDifficulty::Normal,
            AiType::Reckoner => AiDifficulty::Hard,
            AiType::Strategic => AiDifficulty::Expert,
        }
    }

    /// Registry name, as recorded in output rows.
    pub fn name(self) -> &'static str {
        engine::ai::registry::by_difficulty(self.difficulty())
            .map(|factory| factory.name)
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GameModeArg {
    Classic,
    Mixed,
}

impl GameModeArg {
    pub fn to_mode(self) -> GameMode {
        match self {
            GameModeArg::Classic => GameMode::Classic,
            GameModeArg::Mixed => GameMode::Mixed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_types_resolve_to_registry_names() {
        assert_eq!(AiType::Random.name(), "RandomPlayer");
        assert_eq!(AiType::Strategic.name(), "Strategic");
    }
}
