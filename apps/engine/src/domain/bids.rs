//! Bids and raise legality.
//!
//! A bid claims that at least `quantity` dice across all hands show `face`
//! (wilds included unless the face is 1). Face 1 is twice as valuable since
//! it is wild for every other face, so switching into 1s halves the required
//! quantity (rounded up) and switching back out requires doubling plus one.

use serde::{Deserialize, Serialize};

use crate::domain::dice::{FACES, WILD_FACE};
use crate::domain::errors::RuleError;
use crate::domain::state::{GameState, Phase, PlayerId};

/// A public claim `(quantity, face)`. Immutable once made; superseded bids
/// move to the previous-bids log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub bidder: PlayerId,
    pub quantity: u32,
    pub face: u8,
}

/// Raise legality against the current bid, per the escalation rules.
///
/// With no current bid any `quantity >= 1`, `face in 1..=6` is legal.
pub fn raise_is_legal(current: Option<&Bid>, quantity: u32, face: u8) -> bool {
    if quantity < 1 || !(1..=FACES as u8).contains(&face) {
        return false;
    }
    let Some(c) = current else {
        return true;
    };
    match (c.face == WILD_FACE, face == WILD_FACE) {
        // Within the same face class: raise quantity, or raise face at
        // equal quantity.
        (false, false) | (true, true) => {
            quantity > c.quantity || (quantity == c.quantity && face > c.face)
        }
        // Into 1s: the halve-up rule.
        (false, true) => quantity >= c.quantity.div_ceil(2),
        // Out of 1s: inverse of halve-up, plus one to force escalation.
        (true, false) => quantity >= c.quantity * 2 + 1,
    }
}

/// Minimum legal quantity for a raise onto `face`, given the current bid.
pub fn min_raise_quantity(current: Option<&Bid>, face: u8) -> u32 {
    let Some(c) = current else {
        return 1;
    };
    match (c.face == WILD_FACE, face == WILD_FACE) {
        (false, false) | (true, true) => {
            if face > c.face {
                c.quantity
            } else {
                c.quantity + 1
            }
        }
        (false, true) => c.quantity.div_ceil(2),
        (true, false) => c.quantity * 2 + 1,
    }
}

/// Enumerate every legal raise with quantity at most `cap`.
///
/// Used by the AI tiers and the search engine; `cap` is normally the total
/// dice in play, since larger claims can never be true.
pub fn legal_raises(current: Option<&Bid>, cap: u32) -> Vec<(u32, u8)> {
    let mut raises = Vec::new();
    for face in 1..=FACES as u8 {
        let min = min_raise_quantity(current, face);
        for quantity in min..=cap {
            if raise_is_legal(current, quantity, face) {
                raises.push((quantity, face));
            }
        }
    }
    raises
}

/// Place a bid, enforcing phase, turn, and raise legality.
///
/// An armed phantom-bid effect bypasses the raise rules for this one bid
/// and is consumed immediately, independent of the bid's own validity.
pub fn place_bid(
    state: &mut GameState,
    who: PlayerId,
    quantity: u32,
    face: u8,
) -> Result<Bid, RuleError> {
    if state.phase != Phase::Bidding {
        return Err(RuleError::PhaseMismatch {
            expected: "bidding",
        });
    }
    let turn = state
        .current_player()
        .ok_or_else(|| RuleError::other("no player can act"))?;
    if turn != who {
        return Err(RuleError::NotYourTurn);
    }
    if !(1..=FACES as u8).contains(&face) {
        return Err(RuleError::InvalidFace(face));
    }
    if quantity < 1 {
        return Err(RuleError::InvalidQuantity(quantity));
    }

    let phantom = state.players[who as usize].effects.phantom_bid;
    if phantom {
        // Consumed on use, even if the bid itself is then rejected.
        state.players[who as usize].effects.phantom_bid = false;
    } else if !raise_is_legal(state.current_bid.as_ref(), quantity, face) {
        return Err(RuleError::IllegalRaise { quantity, face });
    }

    let bid = Bid {
        bidder: who,
        quantity,
        face,
    };
    if let Some(old) = state.current_bid.replace(bid) {
        state.previous_bids.push(old);
    }
    state.advance_turn();
    tracing::debug!(player = who, quantity, face, phantom, "bid placed");
    Ok(bid)
}
