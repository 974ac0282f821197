//! Reckoner — the Hard tier. Exact probabilities plus opponent reads.
//!
//! Design goals:
//! - Always legal (bids come from the view's `legal_raises()`).
//! - Deterministic (no RNG; same context, same decision).
//! - Probability-grounded: every claim is scored with the exact
//!   Poisson-binomial tail, then shaded by what the opponent model says
//!   about the current bidder.

use super::trait_def::{AiAction, AiError, AiStrategy, Decision};
use super::DecisionContext;
use crate::domain::cards::EffectCard;
use crate::domain::state::PlayerId;

/// Minimum holding probability for a raise this tier will make.
const RAISE_SAFETY: f64 = 0.45;

/// A standing bid below `1 - SUCCESS_THRESHOLD` likelihood gets challenged.
const SUCCESS_THRESHOLD: f64 = 0.55;

/// How strongly the bidder's bluff frequency shades the holding estimate.
const BLUFF_SHADE: f64 = 0.3;

#[derive(Clone)]
pub struct Reckoner {
    _seed: Option<u64>, // reserved, unused: keep determinism
}

impl Reckoner {
    pub const NAME: &'static str = "Reckoner";
    pub const VERSION: &'static str = "1.0.0";

    pub fn new(seed: Option<u64>) -> Self {
        Self { _seed: seed }
    }

    /// Holding probability of the standing bid, shaded by the bidder's
    /// learned bluff frequency and face habits. A frequent bluffer's claim
    /// is discounted; a claim on their pet face slightly less so.
    fn shaded_bid_probability(
        ctx: &DecisionContext<'_>,
        bidder: PlayerId,
        quantity: u32,
        face: u8,
    ) -> Result<f64, AiError> {
        let raw = ctx.bid_probability(quantity, face)?;
        let Some(model) = ctx.models.get(bidder) else {
            return Ok(raw);
        };

        let mut shade = (model.bluff_frequency - 0.5) * BLUFF_SHADE;
        // Bids on a face they favor are more often backed by real dice,
        // but the habit read never outweighs the bluff read.
        shade -= ((model.face_weight(face) - 1.0) * 0.1).clamp(-0.1, 0.1);
        Ok((raw - shade).clamp(0.0, 1.0))
    }

    /// Exact-claim threshold. A failed claim costs a die the short stack
    /// cannot spare, so the gate is strictest near elimination and relaxes
    /// once the caller holds more than the table average.
    fn exact_claim_threshold(ctx: &DecisionContext<'_>) -> f64 {
        let active = ctx.view.players.iter().filter(|p| !p.eliminated).count();
        if active == 0 {
            return 1.0;
        }
        let average = ctx.view.total_dice as f64 / active as f64;
        let own = ctx.view.own_dice.len() as f64;
        let scarcity = (average / own.max(1.0)).clamp(0.3, 1.5);
        0.10 + 0.10 * scarcity
    }

    /// Situational card play before committing to a challenge or raise.
    fn card_before_challenge(
        ctx: &DecisionContext<'_>,
        challenge_win: f64,
    ) -> Option<Decision> {
        let cards = &ctx.view.own_cards;
        // A close call is worth insuring.
        if (0.45..0.75).contains(&challenge_win) && cards.contains(&EffectCard::Insurance) {
            return Some(Decision::new(
                AiAction::PlayCard {
                    card: EffectCard::Insurance,
                    target: None,
                },
                challenge_win,
            ));
        }
        // A near-certain win is worth doubling.
        if challenge_win >= 0.85 && cards.contains(&EffectCard::DoubleStakes) {
            return Some(Decision::new(
                AiAction::PlayCard {
                    card: EffectCard::DoubleStakes,
                    target: None,
                },
                challenge_win,
            ));
        }
        None
    }

    /// The raise with the best holding probability, preferring the higher
    /// quantity among equally safe options to keep pressure on.
    fn best_raise(
        ctx: &DecisionContext<'_>,
        raises: &[(u32, u8)],
    ) -> Result<Option<(u32, u8, f64)>, AiError> {
        let mut best: Option<(u32, u8, f64)> = None;
        for &(quantity, face) in raises {
            let p = ctx.bid_probability(quantity, face)?;
            if p < RAISE_SAFETY {
                continue;
            }
            let better = match best {
                None => true,
                Some((bq, _, _)) => quantity > bq,
            };
            if better {
                best = Some((quantity, face, p));
            }
        }
        Ok(best)
    }
}

impl AiStrategy for Reckoner {
    fn decide(&self, ctx: &DecisionContext<'_>) -> Result<Decision, AiError> {
        let view = ctx.view;

        if let Some(bid) = view.current_bid {
            let holds =
                Self::shaded_bid_probability(ctx, bid.bidder, bid.quantity, bid.face)?;
            let challenge_win = 1.0 - holds;

            let exact = ctx.exact_probability(bid.quantity, bid.face)?;
            if exact >= Self::exact_claim_threshold(ctx) && exact > challenge_win {
                return Ok(Decision::new(AiAction::ExactClaim, exact));
            }

            if holds < 1.0 - SUCCESS_THRESHOLD {
                if let Some(card) = Self::card_before_challenge(ctx, challenge_win) {
                    return Ok(card);
                }
                return Ok(Decision::new(AiAction::Challenge, challenge_win));
            }
        }

        let raises = view.legal_raises();
        if raises.is_empty() {
            if view.current_bid.is_some() {
                return Ok(Decision::new(AiAction::Challenge, 0.5));
            }
            return Err(AiError::InvalidMove("no legal raises available".into()));
        }

        if let Some((quantity, face, p)) = Self::best_raise(ctx, &raises)? {
            return Ok(Decision::new(AiAction::Bid { quantity, face }, p));
        }

        // Nothing safe to raise and the standing bid is plausible: a
        // phantom bid escapes the squeeze, otherwise take the least-bad
        // option between the minimal raise and a challenge.
        if view.own_cards.contains(&EffectCard::PhantomBid) && view.current_bid.is_some() {
            return Ok(Decision::new(
                AiAction::PlayCard {
                    card: EffectCard::PhantomBid,
                    target: None,
                },
                0.5,
            ));
        }

        let &(quantity, face) = raises
            .iter()
            .min_by_key(|&&(q, f)| (q, u8::MAX - f))
            .ok_or_else(|| AiError::Internal("raise list emptied unexpectedly".into()))?;
        let raise_p = ctx.bid_probability(quantity, face)?;
        let challenge_win = match view.current_bid {
            Some(bid) => 1.0 - ctx.bid_probability(bid.quantity, bid.face)?,
            None => 0.0,
        };
        if challenge_win > raise_p && view.current_bid.is_some() {
            return Ok(Decision::new(AiAction::Challenge, challenge_win));
        }
        Ok(Decision::new(AiAction::Bid { quantity, face }, raise_p))
    }
}
