//! Bid legality unit tests, including the wild-face boundary cases.

use crate::domain::bids::{min_raise_quantity, place_bid, raise_is_legal, Bid};
use crate::domain::errors::RuleError;
use crate::domain::fixtures::bidding_state;
use crate::domain::state::Phase;

fn bid(quantity: u32, face: u8) -> Bid {
    Bid {
        bidder: 0,
        quantity,
        face,
    }
}

#[test]
fn opening_bid_accepts_any_quantity_and_face() {
    for face in 1..=6 {
        assert!(raise_is_legal(None, 1, face));
        assert!(raise_is_legal(None, 10, face));
    }
    assert!(!raise_is_legal(None, 0, 3));
    assert!(!raise_is_legal(None, 2, 0));
    assert!(!raise_is_legal(None, 2, 7));
}

#[test]
fn quantity_raise_is_legal_on_any_face_within_class() {
    let c = bid(3, 4);
    assert!(raise_is_legal(Some(&c), 4, 2));
    assert!(raise_is_legal(Some(&c), 4, 6));
    assert!(!raise_is_legal(Some(&c), 3, 3), "same quantity, lower face");
    assert!(raise_is_legal(Some(&c), 3, 5), "same quantity, higher face");
    assert!(!raise_is_legal(Some(&c), 2, 5));
}

#[test]
fn halve_up_boundary_into_wilds() {
    // From (3, face 2): needs quantity >= ceil(3/2) = 2 to switch into 1s.
    let c = bid(3, 2);
    assert!(raise_is_legal(Some(&c), 2, 1));
    assert!(!raise_is_legal(Some(&c), 1, 1));
    assert!(raise_is_legal(Some(&c), 5, 1));
    assert_eq!(min_raise_quantity(Some(&c), 1), 2);
}

#[test]
fn double_plus_one_boundary_out_of_wilds() {
    // From (2, face 1): needs quantity >= 2*2+1 = 5 to leave 1s.
    let c = bid(2, 1);
    assert!(!raise_is_legal(Some(&c), 4, 3));
    assert!(raise_is_legal(Some(&c), 5, 3));
    // Staying on 1s only needs a quantity raise.
    assert!(raise_is_legal(Some(&c), 3, 1));
    assert!(!raise_is_legal(Some(&c), 2, 1));
    assert_eq!(min_raise_quantity(Some(&c), 4), 5);
}

#[test]
fn place_bid_enforces_turn_order() {
    let mut state = bidding_state(3, 5);
    assert_eq!(
        place_bid(&mut state, 1, 2, 3).unwrap_err(),
        RuleError::NotYourTurn
    );
    assert!(place_bid(&mut state, 0, 2, 3).is_ok());
    assert_eq!(state.current_player(), Some(1));
}

#[test]
fn superseded_bids_move_to_the_log() {
    let mut state = bidding_state(3, 5);
    place_bid(&mut state, 0, 2, 3).unwrap();
    place_bid(&mut state, 1, 3, 3).unwrap();
    place_bid(&mut state, 2, 4, 5).unwrap();

    assert_eq!(state.previous_bids.len(), 2);
    assert_eq!(state.previous_bids[0].quantity, 2);
    assert_eq!(state.current_bid.unwrap().quantity, 4);
}

#[test]
fn illegal_raise_leaves_state_untouched() {
    let mut state = bidding_state(2, 5);
    place_bid(&mut state, 0, 3, 4).unwrap();
    let before = state.clone();

    let err = place_bid(&mut state, 1, 2, 4).unwrap_err();
    assert_eq!(
        err,
        RuleError::IllegalRaise {
            quantity: 2,
            face: 4
        }
    );
    assert_eq!(state, before);
}

#[test]
fn phantom_bid_bypasses_raise_rules_once() {
    let mut state = bidding_state(2, 5);
    place_bid(&mut state, 0, 5, 4).unwrap();
    state.players[1].effects.phantom_bid = true;

    // A lowball rebid that would normally be illegal.
    assert!(place_bid(&mut state, 1, 1, 2).is_ok());
    assert!(!state.players[1].effects.phantom_bid, "consumed on use");

    // Next bid from the same player is held to the normal rules again.
    place_bid(&mut state, 0, 2, 2).unwrap();
    assert!(place_bid(&mut state, 1, 1, 2).is_err());
}

#[test]
fn bidding_requires_bidding_phase() {
    let mut state = bidding_state(2, 5);
    state.phase = Phase::Rolling;
    assert_eq!(
        place_bid(&mut state, 0, 2, 3).unwrap_err(),
        RuleError::PhaseMismatch {
            expected: "bidding"
        }
    );
}
