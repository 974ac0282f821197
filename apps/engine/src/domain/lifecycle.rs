//! Game and round lifecycle: seating, dealing, rolling, round advance,
//! pause/resume, and the elimination/winner check.

use rand::prelude::*;

use crate::domain::cards::draw_card;
use crate::domain::dice::{Die, DieKind};
use crate::domain::errors::RuleError;
use crate::domain::state::{
    GameMode, GameState, Phase, PlayerId, PlayerState, MAX_PLAYERS, MIN_PLAYERS,
};

/// Add a player in the lobby. Returns the assigned seat.
pub fn add_player(
    state: &mut GameState,
    name: impl Into<String>,
    is_ai: bool,
) -> Result<PlayerId, RuleError> {
    if state.phase != Phase::Lobby {
        return Err(RuleError::PhaseMismatch { expected: "lobby" });
    }
    if state.players.len() >= MAX_PLAYERS {
        return Err(RuleError::TooManyPlayers);
    }
    let id = state.players.len() as PlayerId;
    state.players.push(PlayerState::new(id, name, is_ai));
    Ok(id)
}

/// Start the game: deal dice to every player per the configured mode and
/// move to `Rolling`.
pub fn start_game(state: &mut GameState, rng: &mut impl Rng) -> Result<(), RuleError> {
    if state.phase != Phase::Lobby {
        return Err(RuleError::PhaseMismatch { expected: "lobby" });
    }
    if state.players.len() < MIN_PLAYERS {
        return Err(RuleError::NotEnoughPlayers);
    }

    for player in state.players.iter_mut() {
        player.dice.clear();
        for _ in 0..state.config.dice_per_player {
            let kind = match state.config.mode {
                GameMode::Classic => DieKind::D6,
                GameMode::Mixed => *DieKind::ALL.choose(rng).unwrap_or(&DieKind::D6),
            };
            player.dice.push(Die::new(kind));
        }
        if state.config.mode == GameMode::Mixed {
            player.cards.push(draw_card(rng));
        }
    }

    state.round_no = 1;
    state.turn_index = 0;
    state.phase = Phase::Rolling;
    tracing::info!(players = state.players.len(), mode = ?state.config.mode, "game started");
    Ok(())
}

/// Re-roll every active player's dice uniformly over each die's face set
/// and move to `Bidding`.
pub fn roll_for_round(state: &mut GameState, rng: &mut impl Rng) -> Result<(), RuleError> {
    if state.phase != Phase::Rolling {
        return Err(RuleError::PhaseMismatch {
            expected: "rolling",
        });
    }
    for player in state.players.iter_mut().filter(|p| !p.eliminated) {
        for die in player.dice.iter_mut() {
            die.roll(rng);
        }
    }
    state.phase = Phase::Bidding;
    tracing::debug!(round = state.round_no, "dice rolled");
    Ok(())
}

/// Advance to the next round: clear all active effects, reset the bid log
/// and challenge result, and seed the starting turn with the previous
/// round's loser.
pub fn start_new_round(state: &mut GameState) -> Result<(), RuleError> {
    if state.phase != Phase::RoundEnd {
        return Err(RuleError::PhaseMismatch {
            expected: "round_end",
        });
    }
    let starting_seat = state
        .last_challenge
        .as_ref()
        .map(|r| r.loser)
        .filter(|&loser| {
            state
                .player(loser)
                .map(|p| !p.eliminated)
                .unwrap_or(false)
        })
        .unwrap_or(0);

    for player in state.players.iter_mut() {
        player.effects.clear();
    }
    state.current_bid = None;
    state.previous_bids.clear();
    state.last_challenge = None;
    state.round_no += 1;
    state.set_turn(starting_seat);
    state.phase = Phase::Rolling;
    tracing::debug!(round = state.round_no, starting_seat, "new round started");
    Ok(())
}

/// Suspend the game from any active phase, recording where to resume.
pub fn pause(state: &mut GameState) -> Result<(), RuleError> {
    match state.phase {
        Phase::Rolling | Phase::Bidding | Phase::ChallengeCalled | Phase::RoundEnd => {
            state.paused_from = Some(state.phase);
            state.phase = Phase::Paused;
            Ok(())
        }
        _ => Err(RuleError::PhaseMismatch {
            expected: "an active phase",
        }),
    }
}

/// Restore the phase recorded by [`pause`].
pub fn resume(state: &mut GameState) -> Result<(), RuleError> {
    if state.phase != Phase::Paused {
        return Err(RuleError::NotPaused);
    }
    let from = state.paused_from.take().ok_or(RuleError::NotPaused)?;
    state.phase = from;
    Ok(())
}

/// Re-evaluate eliminations and the winner condition.
///
/// Must run after every dice-count-changing mutation: a player is
/// eliminated exactly when their dice run out, and exactly one active
/// player remaining ends the game.
pub fn check_winner(state: &mut GameState) {
    for player in state.players.iter_mut() {
        if player.dice.is_empty() && !player.eliminated {
            player.eliminated = true;
            tracing::info!(player = player.id, "player eliminated");
        }
    }
    let active: Vec<PlayerId> = state.active_seats();
    if active.len() == 1 && state.round_no > 0 {
        state.winner = Some(active[0]);
        state.phase = Phase::GameOver;
        tracing::info!(winner = active[0], "game over");
    }
}
