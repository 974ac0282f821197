//! Test fixtures for domain states.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::dice::{roll_die, DieKind};
use crate::domain::state::{GameConfig, GameState, Phase, PlayerState};

/// A game mid-bidding: `n` players with `dice_each` rolled six-sided dice,
/// seat 0 to act. Deterministic faces (fixed seed).
pub fn bidding_state(n: usize, dice_each: usize) -> GameState {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut state = GameState::new(GameConfig::default());
    for id in 0..n {
        let mut player = PlayerState::new(id as u8, format!("P{id}"), false);
        for _ in 0..dice_each {
            player.dice.push(roll_die(DieKind::D6, &mut rng));
        }
        state.players.push(player);
    }
    state.round_no = 1;
    state.turn_index = 0;
    state.phase = Phase::Bidding;
    state
}

/// A game mid-bidding with exact D6 faces per player.
pub fn bidding_state_with_faces(faces: &[&[u8]]) -> GameState {
    let mut state = bidding_state(faces.len(), 0);
    for (player, row) in state.players.iter_mut().zip(faces) {
        for &value in *row {
            player.dice.push(crate::domain::dice::Die {
                kind: DieKind::D6,
                value,
            });
        }
    }
    state
}
