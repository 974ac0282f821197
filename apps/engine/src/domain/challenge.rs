//! Challenge and exact-claim resolution.
//!
//! A challenge claims the current bid overstates the true count; an exact
//! claim stakes that it is exactly correct. Both reveal every active hand
//! and tally the challenged face with the wild rule applied.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::bids::Bid;
use crate::domain::cards::draw_card;
use crate::domain::dice::{Die, WILD_FACE};
use crate::domain::errors::RuleError;
use crate::domain::lifecycle::check_winner;
use crate::domain::state::{
    require_active, require_current_bid, GameMode, GameState, Phase, PlayerId,
};

/// Which resolution rule produced this result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Success iff the tally falls short of the bid quantity.
    AtLeast,
    /// Success iff the tally equals the bid quantity exactly.
    Exact,
}

/// Outcome of a challenge or exact claim, including the full reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeResult {
    pub kind: ChallengeKind,
    pub caller: PlayerId,
    pub bid: Bid,
    /// The original bidder.
    pub target: PlayerId,
    pub actual_count: u32,
    pub success: bool,
    pub loser: PlayerId,
    /// Per-player dice reveal at resolution time.
    pub reveal: Vec<(PlayerId, Vec<Die>)>,
}

/// Count dice matching `face` across all active players (wild rule applied).
pub fn tally_face(state: &GameState, face: u8) -> u32 {
    state
        .players
        .iter()
        .filter(|p| !p.eliminated)
        .flat_map(|p| p.dice.iter())
        .filter(|d| d.matches(face))
        .count() as u32
}

/// Count matches for `face` within an already-captured reveal.
pub fn tally_reveal(reveal: &[(PlayerId, Vec<Die>)], face: u8) -> u32 {
    reveal
        .iter()
        .flat_map(|(_, dice)| dice.iter())
        .filter(|d| d.matches(face))
        .count() as u32
}

fn reveal_all(state: &GameState) -> Vec<(PlayerId, Vec<Die>)> {
    state
        .players
        .iter()
        .filter(|p| !p.eliminated)
        .map(|p| (p.id, p.dice.clone()))
        .collect()
}

/// Call an "at-least" challenge against the current bid, or — with an armed
/// late-challenge effect — against a specific entry of the previous-bids
/// log. Transitions to `ChallengeCalled`; dice are removed by
/// [`apply_challenge_outcome`].
pub fn call_challenge(
    state: &mut GameState,
    caller: PlayerId,
    bid_index: Option<usize>,
) -> Result<ChallengeResult, RuleError> {
    if state.phase != Phase::Bidding {
        return Err(RuleError::PhaseMismatch {
            expected: "bidding",
        });
    }
    require_active(state, caller)?;
    let current = require_current_bid(state)?;
    let turn = state
        .current_player()
        .ok_or_else(|| RuleError::other("no player can act"))?;
    if turn != caller {
        return Err(RuleError::NotYourTurn);
    }

    let bid = match bid_index {
        None => current,
        Some(idx) => {
            if !state.players[caller as usize].effects.late_challenge {
                return Err(RuleError::EffectNotActive);
            }
            let bid = *state.previous_bids.get(idx).ok_or(RuleError::NoSuchBid)?;
            state.players[caller as usize].effects.late_challenge = false;
            bid
        }
    };

    let actual = tally_face(state, bid.face);
    let success = actual < bid.quantity;
    let loser = if success { bid.bidder } else { caller };
    let result = ChallengeResult {
        kind: ChallengeKind::AtLeast,
        caller,
        bid,
        target: bid.bidder,
        actual_count: actual,
        success,
        loser,
        reveal: reveal_all(state),
    };

    state.phase = Phase::ChallengeCalled;
    state.last_challenge = Some(result.clone());
    tracing::debug!(
        caller,
        bidder = bid.bidder,
        quantity = bid.quantity,
        face = bid.face,
        actual,
        success,
        "challenge called"
    );
    Ok(result)
}

/// Call an exact claim against the current bid.
///
/// Unlike a challenge this resolves dice immediately: success grants the
/// caller one fresh die of the base kind, failure costs their lowest-index
/// die. Transitions to `RoundEnd` (or `GameOver` via the winner check).
pub fn call_exact_claim(
    state: &mut GameState,
    caller: PlayerId,
) -> Result<ChallengeResult, RuleError> {
    if state.phase != Phase::Bidding {
        return Err(RuleError::PhaseMismatch {
            expected: "bidding",
        });
    }
    require_active(state, caller)?;
    let bid = require_current_bid(state)?;
    let turn = state
        .current_player()
        .ok_or_else(|| RuleError::other("no player can act"))?;
    if turn != caller {
        return Err(RuleError::NotYourTurn);
    }

    let actual = tally_face(state, bid.face);
    let success = actual == bid.quantity;
    let loser = if success { bid.bidder } else { caller };
    let result = ChallengeResult {
        kind: ChallengeKind::Exact,
        caller,
        bid,
        target: bid.bidder,
        actual_count: actual,
        success,
        loser,
        reveal: reveal_all(state),
    };

    if success {
        let kind = state.config.base_kind();
        state.players[caller as usize].dice.push(Die::new(kind));
    } else if !state.players[caller as usize].dice.is_empty() {
        state.players[caller as usize].dice.remove(0);
    }

    state.last_challenge = Some(result.clone());
    state.phase = Phase::RoundEnd;
    check_winner(state);
    tracing::debug!(caller, actual, quantity = bid.quantity, success, "exact claim called");
    Ok(result)
}

/// Dice mutations applied by [`apply_challenge_outcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeApplied {
    pub loser: PlayerId,
    pub dice_lost: usize,
    pub card_drawn: bool,
    pub eliminated: bool,
}

/// Apply the dice loss of a resolved "at-least" challenge.
///
/// The loser loses one die; two if their own double-stakes effect was armed;
/// none if their insurance was armed and they are the original caller
/// (insurance protects only a failed challenge by its owner, and takes
/// precedence over double-stakes for the insured party). Mixed mode awards
/// a card to the losing player when dice were actually lost and their hand
/// is below the maximum; an insured loss draws nothing.
pub fn apply_challenge_outcome(
    state: &mut GameState,
    rng: &mut impl Rng,
) -> Result<OutcomeApplied, RuleError> {
    if state.phase != Phase::ChallengeCalled {
        return Err(RuleError::PhaseMismatch {
            expected: "challenge_called",
        });
    }
    let result = state
        .last_challenge
        .clone()
        .ok_or_else(|| RuleError::other("no challenge to apply"))?;
    let loser = result.loser;

    let insured = state.players[loser as usize].effects.insurance && loser == result.caller;
    let doubled = state.players[loser as usize].effects.double_stakes;
    let losses = if insured {
        state.players[loser as usize].effects.insurance = false;
        0
    } else if doubled {
        state.players[loser as usize].effects.double_stakes = false;
        2
    } else {
        1
    };

    let dice = &mut state.players[loser as usize].dice;
    let dice_lost = losses.min(dice.len());
    for _ in 0..dice_lost {
        dice.remove(0);
    }

    let mut card_drawn = false;
    if dice_lost > 0
        && state.config.mode == GameMode::Mixed
        && state.players[loser as usize].cards.len() < state.config.max_cards
    {
        let card = draw_card(rng);
        state.players[loser as usize].cards.push(card);
        card_drawn = true;
    }

    state.phase = Phase::RoundEnd;
    check_winner(state);
    let eliminated = state.players[loser as usize].eliminated;
    tracing::debug!(loser, dice_lost, card_drawn, eliminated, "challenge outcome applied");
    Ok(OutcomeApplied {
        loser,
        dice_lost,
        card_drawn,
        eliminated,
    })
}
