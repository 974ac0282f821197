//! Command intake: the single entry point the session layer feeds
//! validated, identity-attributed commands through.
//!
//! Authenticating the acting identity against transport identity is the
//! session layer's job; the engine only enforces game rules. One command is
//! fully applied (validated, mutated, side effects resolved) before the
//! next is accepted.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::bids::place_bid;
use crate::domain::cards::{play_card, EffectCard};
use crate::domain::challenge::{apply_challenge_outcome, call_challenge, call_exact_claim};
use crate::domain::errors::RuleError;
use crate::domain::events::GameEvent;
use crate::domain::lifecycle::{pause, resume, roll_for_round, start_game, start_new_round};
use crate::domain::state::{GameState, Phase, PlayerId};

/// Boundary command contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Command {
    Start,
    RollForRound,
    PlaceBid {
        quantity: u32,
        face: u8,
    },
    CallChallenge {
        /// Index into the previous-bids log for a late challenge.
        bid_index: Option<usize>,
    },
    CallExactClaim,
    PlayCard {
        card: EffectCard,
        target: Option<PlayerId>,
    },
    StartNewRound,
    Pause,
    Resume,
}

/// Apply one command for the given player, returning the events produced.
///
/// Rule violations leave the state in its last valid condition.
pub fn apply_command(
    state: &mut GameState,
    who: PlayerId,
    command: Command,
    rng: &mut impl Rng,
) -> Result<Vec<GameEvent>, RuleError> {
    let mut events = Vec::new();
    match command {
        Command::Start => {
            start_game(state, rng)?;
            events.push(GameEvent::GameStarted {
                players: state.players.len(),
            });
        }
        Command::RollForRound => {
            roll_for_round(state, rng)?;
            events.push(GameEvent::DiceRolled {
                round_no: state.round_no,
            });
        }
        Command::PlaceBid { quantity, face } => {
            let bid = place_bid(state, who, quantity, face)?;
            events.push(GameEvent::BidPlaced { bid });
        }
        Command::CallChallenge { bid_index } => {
            let result = call_challenge(state, who, bid_index)?;
            events.push(GameEvent::ChallengeResolved(result));
            let applied = apply_challenge_outcome(state, rng)?;
            if applied.dice_lost > 0 {
                events.push(GameEvent::DiceLost {
                    player: applied.loser,
                    count: applied.dice_lost,
                });
            }
            if applied.card_drawn {
                events.push(GameEvent::CardDrawn {
                    player: applied.loser,
                });
            }
            if applied.eliminated {
                events.push(GameEvent::PlayerEliminated {
                    player: applied.loser,
                });
            }
        }
        Command::CallExactClaim => {
            let result = call_exact_claim(state, who)?;
            let loser = result.loser;
            let success = result.success;
            events.push(GameEvent::ExactClaimResolved(result));
            if !success {
                events.push(GameEvent::DiceLost {
                    player: loser,
                    count: 1,
                });
                if state
                    .player(loser)
                    .map(|p| p.eliminated)
                    .unwrap_or(false)
                {
                    events.push(GameEvent::PlayerEliminated { player: loser });
                }
            }
        }
        Command::PlayCard { card, target } => {
            let played = play_card(state, who, card, target, rng)?;
            events.push(GameEvent::CardPlayed(played));
        }
        Command::StartNewRound => {
            start_new_round(state)?;
            events.push(GameEvent::RoundStarted {
                round_no: state.round_no,
            });
        }
        Command::Pause => {
            pause(state)?;
            events.push(GameEvent::Paused);
        }
        Command::Resume => {
            resume(state)?;
            events.push(GameEvent::Resumed { phase: state.phase });
        }
    }

    if state.phase == Phase::GameOver {
        if let Some(winner) = state.winner {
            if !events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
            {
                events.push(GameEvent::GameOver { winner });
            }
        }
    }
    Ok(events)
}
