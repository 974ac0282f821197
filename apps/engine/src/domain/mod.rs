//! Domain layer: the authoritative game-rules state machine.

pub mod bids;
pub mod cards;
pub mod challenge;
pub mod commands;
pub mod dice;
pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod player_view;
pub mod seeds;
pub mod state;

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
mod tests_bids;
#[cfg(test)]
mod tests_challenge;
#[cfg(test)]
mod tests_integration;
#[cfg(test)]
mod tests_lifecycle;
#[cfg(test)]
mod tests_props_bids;

// Re-exports for ergonomics
pub use bids::{legal_raises, place_bid, raise_is_legal, Bid};
pub use cards::{play_card, ActiveEffects, CardPlayed, EffectCard};
pub use challenge::{
    apply_challenge_outcome, call_challenge, call_exact_claim, tally_face, ChallengeKind,
    ChallengeResult,
};
pub use commands::{apply_command, Command};
pub use dice::{roll_die, Die, DieKind, FACES, WILD_FACE};
pub use errors::RuleError;
pub use events::GameEvent;
pub use lifecycle::{
    add_player, check_winner, pause, resume, roll_for_round, start_game, start_new_round,
};
pub use player_view::{table_view, PlayerPublic, TableView};
pub use state::{GameConfig, GameMode, GameState, Phase, PlayerId, PlayerState};
