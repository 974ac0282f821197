//! Challenge and exact-claim resolution tests.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::bids::place_bid;
use crate::domain::challenge::{
    apply_challenge_outcome, call_challenge, call_exact_claim, tally_face, ChallengeKind,
};
use crate::domain::errors::RuleError;
use crate::domain::fixtures::bidding_state_with_faces;
use crate::domain::state::{GameMode, Phase};

#[test]
fn tally_counts_wilds_for_non_wild_faces_only() {
    let state = bidding_state_with_faces(&[&[4, 1, 2], &[4, 3, 1]]);
    assert_eq!(tally_face(&state, 4), 4); // two 4s + two wild 1s
    assert_eq!(tally_face(&state, 1), 2); // only actual 1s
    assert_eq!(tally_face(&state, 5), 2); // wilds alone
}

#[test]
fn challenge_fails_when_bid_is_exactly_met() {
    // Spec scenario: 2 players x 2 dice, bid (2, face 4); reveal holds one 4
    // and one 1 -> effective count 2, so "actual < quantity" is false and
    // the caller loses a die.
    let mut state = bidding_state_with_faces(&[&[4, 2], &[1, 3]]);
    let mut rng = StdRng::seed_from_u64(1);
    place_bid(&mut state, 0, 2, 4).unwrap();

    let result = call_challenge(&mut state, 1, None).unwrap();
    assert_eq!(result.kind, ChallengeKind::AtLeast);
    assert_eq!(result.actual_count, 2);
    assert!(!result.success);
    assert_eq!(result.loser, 1);
    assert_eq!(state.phase, Phase::ChallengeCalled);

    let applied = apply_challenge_outcome(&mut state, &mut rng).unwrap();
    assert_eq!(applied.loser, 1);
    assert_eq!(applied.dice_lost, 1);
    assert_eq!(state.players[1].die_count(), 1);
    assert_eq!(state.phase, Phase::RoundEnd);
}

#[test]
fn upheld_challenge_costs_the_bidder() {
    let mut state = bidding_state_with_faces(&[&[2, 3], &[5, 6]]);
    let mut rng = StdRng::seed_from_u64(2);
    place_bid(&mut state, 0, 3, 4).unwrap();

    let result = call_challenge(&mut state, 1, None).unwrap();
    assert_eq!(result.actual_count, 0);
    assert!(result.success);
    assert_eq!(result.loser, 0);

    apply_challenge_outcome(&mut state, &mut rng).unwrap();
    assert_eq!(state.players[0].die_count(), 1);
    assert_eq!(state.players[1].die_count(), 2);
}

#[test]
fn challenge_requires_a_current_bid() {
    let mut state = bidding_state_with_faces(&[&[2, 3], &[5, 6]]);
    assert_eq!(
        call_challenge(&mut state, 0, None).unwrap_err(),
        RuleError::NoCurrentBid
    );
}

#[test]
fn reveal_covers_every_active_hand() {
    let mut state = bidding_state_with_faces(&[&[2, 3], &[5, 6], &[1, 1]]);
    place_bid(&mut state, 0, 1, 2).unwrap();
    let result = call_challenge(&mut state, 1, None).unwrap();
    assert_eq!(result.reveal.len(), 3);
    let revealed: usize = result.reveal.iter().map(|(_, d)| d.len()).sum();
    assert_eq!(revealed, 6);
}

#[test]
fn late_challenge_targets_a_logged_bid_and_consumes_the_effect() {
    let mut state = bidding_state_with_faces(&[&[2, 2], &[5, 6], &[3, 3]]);
    place_bid(&mut state, 0, 2, 2).unwrap(); // true: two 2s
    place_bid(&mut state, 1, 5, 6).unwrap(); // wild overbid, goes to log next
    place_bid(&mut state, 2, 6, 6).unwrap();
    state.players[0].effects.late_challenge = true;

    // Seat 0 challenges the logged (5, face 6) bid by seat 1.
    let result = call_challenge(&mut state, 0, Some(1)).unwrap();
    assert_eq!(result.bid.bidder, 1);
    assert_eq!(result.bid.quantity, 5);
    assert!(result.success);
    assert_eq!(result.loser, 1);
    assert!(!state.players[0].effects.late_challenge);
}

#[test]
fn late_challenge_without_the_effect_is_rejected() {
    let mut state = bidding_state_with_faces(&[&[2, 2], &[5, 6]]);
    place_bid(&mut state, 0, 2, 2).unwrap();
    place_bid(&mut state, 1, 3, 2).unwrap();
    assert_eq!(
        call_challenge(&mut state, 0, Some(0)).unwrap_err(),
        RuleError::EffectNotActive
    );
}

#[test]
fn exact_claim_success_grants_a_die() {
    let mut state = bidding_state_with_faces(&[&[4, 2], &[1, 3]]);
    place_bid(&mut state, 0, 2, 4).unwrap();

    let result = call_exact_claim(&mut state, 1).unwrap();
    assert_eq!(result.kind, ChallengeKind::Exact);
    assert!(result.success);
    assert_eq!(state.players[1].die_count(), 3);
    assert_eq!(state.phase, Phase::RoundEnd);
    // Total dice increased by exactly one.
    assert_eq!(state.total_dice(), 5);
}

#[test]
fn exact_claim_failure_costs_the_lowest_index_die() {
    let mut state = bidding_state_with_faces(&[&[4, 2], &[1, 3]]);
    place_bid(&mut state, 0, 3, 4).unwrap(); // actual is 2, not 3

    let first_die = state.players[1].dice[0];
    let result = call_exact_claim(&mut state, 1).unwrap();
    assert!(!result.success);
    assert_eq!(result.loser, 1);
    assert_eq!(state.players[1].die_count(), 1);
    assert!(!state.players[1].dice.contains(&first_die));
}

#[test]
fn insurance_protects_only_the_failed_caller() {
    let mut rng = StdRng::seed_from_u64(3);

    // Caller loses the challenge but is insured: loses nothing.
    let mut state = bidding_state_with_faces(&[&[4, 4], &[1, 3]]);
    place_bid(&mut state, 0, 2, 4).unwrap();
    state.players[1].effects.insurance = true;
    call_challenge(&mut state, 1, None).unwrap();
    let applied = apply_challenge_outcome(&mut state, &mut rng).unwrap();
    assert_eq!(applied.dice_lost, 0);
    assert_eq!(state.players[1].die_count(), 2);
    assert!(!state.players[1].effects.insurance, "consumed");

    // The bidder losing an upheld challenge gets no insurance protection.
    let mut state = bidding_state_with_faces(&[&[2, 3], &[5, 6]]);
    place_bid(&mut state, 0, 4, 4).unwrap();
    state.players[0].effects.insurance = true;
    call_challenge(&mut state, 1, None).unwrap();
    let applied = apply_challenge_outcome(&mut state, &mut rng).unwrap();
    assert_eq!(applied.loser, 0);
    assert_eq!(applied.dice_lost, 1);
}

#[test]
fn double_stakes_doubles_the_losers_cost() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut state = bidding_state_with_faces(&[&[2, 3, 5], &[5, 6, 2]]);
    place_bid(&mut state, 0, 5, 4).unwrap();
    state.players[0].effects.double_stakes = true;
    call_challenge(&mut state, 1, None).unwrap();

    let applied = apply_challenge_outcome(&mut state, &mut rng).unwrap();
    assert_eq!(applied.loser, 0);
    assert_eq!(applied.dice_lost, 2);
    assert_eq!(state.players[0].die_count(), 1);
}

#[test]
fn insurance_takes_precedence_over_double_stakes() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut state = bidding_state_with_faces(&[&[4, 4], &[1, 3]]);
    place_bid(&mut state, 0, 2, 4).unwrap();
    state.players[1].effects.insurance = true;
    state.players[1].effects.double_stakes = true;
    call_challenge(&mut state, 1, None).unwrap();

    let applied = apply_challenge_outcome(&mut state, &mut rng).unwrap();
    assert_eq!(applied.dice_lost, 0);
}

#[test]
fn mixed_mode_awards_a_card_to_the_loser() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut state = bidding_state_with_faces(&[&[2, 3], &[5, 6]]);
    state.config.mode = GameMode::Mixed;
    place_bid(&mut state, 0, 4, 4).unwrap();
    call_challenge(&mut state, 1, None).unwrap();

    let applied = apply_challenge_outcome(&mut state, &mut rng).unwrap();
    assert!(applied.card_drawn);
    assert_eq!(state.players[0].cards.len(), 1);
}

#[test]
fn an_insured_loss_draws_no_card() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = bidding_state_with_faces(&[&[4, 4], &[1, 3]]);
    state.config.mode = GameMode::Mixed;
    place_bid(&mut state, 0, 2, 4).unwrap();
    state.players[1].effects.insurance = true;
    call_challenge(&mut state, 1, None).unwrap();

    let applied = apply_challenge_outcome(&mut state, &mut rng).unwrap();
    assert_eq!(applied.dice_lost, 0);
    assert!(!applied.card_drawn, "card award follows actual dice loss");
    assert!(state.players[1].cards.is_empty());
}
