//! Random AI strategy - the Easy tier and the fallback baseline.
//!
//! Mostly random but not pure noise: a 40% slice of its bids lean on the
//! face it actually holds most of, so games against it still feel like
//! dice are involved.

use std::sync::Mutex;

use rand::prelude::*;

use super::trait_def::{AiAction, AiError, AiStrategy, Decision};
use super::DecisionContext;
use crate::domain::bids::min_raise_quantity;
use crate::domain::dice::FACES;

/// Hard cap on this tier's challenge probability.
const CHALLENGE_CAP: f64 = 0.6;

/// Chance of playing a held card instead of acting on the bid.
const CARD_PLAY_CHANCE: f64 = 0.15;

pub struct RandomPlayer {
    /// `Mutex` for interior mutability: `decide` takes `&self` but the RNG
    /// needs mutable access.
    rng: Mutex<StdRng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";
    pub const VERSION: &'static str = "1.0.0";

    /// Create a new `RandomPlayer`. `Some(seed)` gives reproducible
    /// behavior for tests; `None` uses system entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl AiStrategy for RandomPlayer {
    fn decide(&self, ctx: &DecisionContext<'_>) -> Result<Decision, AiError> {
        let view = ctx.view;
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;

        // Challenge chance grows linearly with how much of the table the
        // current bid claims.
        if let Some(bid) = &view.current_bid {
            let total = view.total_dice.max(1) as f64;
            let p = (bid.quantity as f64 / total).min(CHALLENGE_CAP);
            if rng.random_bool(p) {
                return Ok(Decision::new(AiAction::Challenge, p));
            }
        }

        let playable = ctx.playable_cards();
        if !playable.is_empty() && rng.random_bool(CARD_PLAY_CHANCE) {
            if let Some(&(card, target)) = playable.choose(&mut *rng) {
                return Ok(Decision::new(AiAction::PlayCard { card, target }, 0.5));
            }
        }

        let raises = view.legal_raises();
        if raises.is_empty() {
            // Nothing left to bid; a challenge is always available once a
            // bid exists.
            if view.current_bid.is_some() {
                return Ok(Decision::new(AiAction::Challenge, 0.5));
            }
            return Err(AiError::InvalidMove("no legal raises available".into()));
        }

        // 40% of the time, bid the face we hold most of at its minimum
        // legal quantity, with occasional +1 noise.
        if rng.random_bool(0.4) {
            let best_face = (1..=FACES as u8)
                .max_by_key(|&f| view.own_matching(f))
                .unwrap_or(2);
            let mut quantity = min_raise_quantity(view.current_bid.as_ref(), best_face);
            if rng.random_bool(0.3) {
                quantity += 1;
            }
            if raises.contains(&(quantity, best_face)) {
                return Ok(Decision::new(
                    AiAction::Bid {
                        quantity,
                        face: best_face,
                    },
                    0.5,
                ));
            }
        }

        let &(quantity, face) = raises
            .choose(&mut *rng)
            .ok_or_else(|| AiError::Internal("failed to choose a random raise".into()))?;
        Ok(Decision::new(AiAction::Bid { quantity, face }, 0.5))
    }
}
