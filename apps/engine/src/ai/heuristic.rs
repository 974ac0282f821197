//! Heuristic AI strategy - the Normal tier.
//!
//! No exact probability work: every hidden die is treated as matching a
//! given face with probability 1/3 (its own face plus the wild), so the
//! expected count for a face is `own matching + hidden / 3`. Decisions
//! compare the current claim against that expectation with fixed margins.

use super::trait_def::{AiAction, AiError, AiStrategy, Decision};
use super::DecisionContext;
use crate::domain::bids::min_raise_quantity;
use crate::domain::cards::EffectCard;
use crate::domain::dice::{FACES, WILD_FACE};

/// Claims this far above expectation get challenged outright.
const CHALLENGE_MARGIN: f64 = 1.5;

/// Raises this far below expectation are considered safe.
const RAISE_MARGIN: f64 = 0.5;

pub struct Heuristic;

impl Heuristic {
    pub const NAME: &'static str = "Heuristic";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(_seed: Option<u64>) -> Self {
        Self
    }

    /// Expected table count for `face` from the viewer's seat.
    fn expected(ctx: &DecisionContext<'_>, face: u8) -> f64 {
        let certain = (ctx.view.own_matching(face) + ctx.known_matching(face)) as f64;
        let hidden = ctx.hidden_kinds().len() as f64;
        // Wild bids only count actual 1s, roughly 1/6 per hidden die.
        let per_die = if face == WILD_FACE { 1.0 / 6.0 } else { 1.0 / 3.0 };
        certain + hidden * per_die
    }

    /// The face with the highest expected count, preferring non-wilds on
    /// ties (wild bids are harder to continue from).
    fn best_face(ctx: &DecisionContext<'_>) -> u8 {
        (2..=FACES as u8)
            .chain(std::iter::once(WILD_FACE))
            .max_by(|&a, &b| {
                Self::expected(ctx, a)
                    .partial_cmp(&Self::expected(ctx, b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(2)
    }
}

impl AiStrategy for Heuristic {
    fn decide(&self, ctx: &DecisionContext<'_>) -> Result<Decision, AiError> {
        let view = ctx.view;

        if let Some(bid) = &view.current_bid {
            let expected = Self::expected(ctx, bid.face);
            let shortfall = bid.quantity as f64 - expected;

            if shortfall > CHALLENGE_MARGIN {
                let confidence = (shortfall / (CHALLENGE_MARGIN * 2.0)).min(1.0);
                return Ok(Decision::new(AiAction::Challenge, confidence));
            }

            // Marginal challenge territory: arm insurance first if held, so
            // a wrong call costs nothing.
            if shortfall > CHALLENGE_MARGIN / 2.0 {
                if view.own_cards.contains(&EffectCard::Insurance) {
                    return Ok(Decision::new(
                        AiAction::PlayCard {
                            card: EffectCard::Insurance,
                            target: None,
                        },
                        0.6,
                    ));
                }
                return Ok(Decision::new(AiAction::Challenge, 0.55));
            }
        }

        let raises = view.legal_raises();
        if raises.is_empty() {
            if view.current_bid.is_some() {
                return Ok(Decision::new(AiAction::Challenge, 0.5));
            }
            return Err(AiError::InvalidMove("no legal raises available".into()));
        }

        // Prefer a confident raise on our best face; otherwise take the
        // smallest legal increment and hand the problem onward.
        let face = Self::best_face(ctx);
        let quantity = min_raise_quantity(view.current_bid.as_ref(), face);
        let expected = Self::expected(ctx, face);
        if expected >= quantity as f64 + RAISE_MARGIN && raises.contains(&(quantity, face)) {
            return Ok(Decision::new(AiAction::Bid { quantity, face }, 0.7));
        }

        let &(quantity, face) = raises
            .iter()
            .min_by_key(|&&(q, f)| (q, u8::MAX - f))
            .ok_or_else(|| AiError::Internal("raise list emptied unexpectedly".into()))?;
        Ok(Decision::new(AiAction::Bid { quantity, face }, 0.5))
    }
}
