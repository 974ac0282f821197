//! Lifecycle tests: start, rolling, round advance, pause/resume,
//! elimination and winner detection.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::bids::place_bid;
use crate::domain::challenge::{apply_challenge_outcome, call_challenge};
use crate::domain::errors::RuleError;
use crate::domain::fixtures::{bidding_state, bidding_state_with_faces};
use crate::domain::lifecycle::{
    add_player, check_winner, pause, resume, roll_for_round, start_game, start_new_round,
};
use crate::domain::state::{GameConfig, GameMode, GameState, Phase};

#[test]
fn start_requires_two_players_and_lobby_phase() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut state = GameState::new(GameConfig::default());
    add_player(&mut state, "solo", false).unwrap();
    assert_eq!(
        start_game(&mut state, &mut rng).unwrap_err(),
        RuleError::NotEnoughPlayers
    );

    add_player(&mut state, "bot", true).unwrap();
    start_game(&mut state, &mut rng).unwrap();
    assert_eq!(state.phase, Phase::Rolling);
    assert_eq!(state.round_no, 1);
    for p in &state.players {
        assert_eq!(p.die_count(), 5);
    }
    assert!(start_game(&mut state, &mut rng).is_err(), "already started");
}

#[test]
fn lobby_caps_at_six_seats() {
    let mut state = GameState::new(GameConfig::default());
    for i in 0..6 {
        add_player(&mut state, format!("p{i}"), false).unwrap();
    }
    assert_eq!(
        add_player(&mut state, "seventh", false).unwrap_err(),
        RuleError::TooManyPlayers
    );
}

#[test]
fn mixed_mode_deals_a_starting_card() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut state = GameState::new(GameConfig {
        mode: GameMode::Mixed,
        ..GameConfig::default()
    });
    add_player(&mut state, "a", false).unwrap();
    add_player(&mut state, "b", false).unwrap();
    start_game(&mut state, &mut rng).unwrap();
    for p in &state.players {
        assert_eq!(p.cards.len(), 1);
    }
}

#[test]
fn roll_for_round_moves_to_bidding() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut state = GameState::new(GameConfig::default());
    add_player(&mut state, "a", false).unwrap();
    add_player(&mut state, "b", false).unwrap();
    start_game(&mut state, &mut rng).unwrap();

    roll_for_round(&mut state, &mut rng).unwrap();
    assert_eq!(state.phase, Phase::Bidding);
    for p in &state.players {
        for die in &p.dice {
            assert!(die.kind.face_table().contains(&die.value));
        }
    }
}

#[test]
fn new_round_clears_effects_and_seeds_turn_with_the_loser() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut state = bidding_state_with_faces(&[&[2, 3], &[5, 6], &[2, 2]]);
    state.players[2].effects.insurance = true;
    place_bid(&mut state, 0, 5, 4).unwrap();
    call_challenge(&mut state, 1, None).unwrap();
    apply_challenge_outcome(&mut state, &mut rng).unwrap();
    assert_eq!(state.phase, Phase::RoundEnd);

    start_new_round(&mut state).unwrap();
    assert_eq!(state.phase, Phase::Rolling);
    assert_eq!(state.round_no, 2);
    assert!(state.current_bid.is_none());
    assert!(state.previous_bids.is_empty());
    assert!(state.last_challenge.is_none());
    assert!(!state.players[2].effects.insurance);
    // Loser of the challenge (the bidder, seat 0) starts the next round.
    assert_eq!(state.current_player(), Some(0));
}

#[test]
fn start_new_round_requires_round_end() {
    let mut state = bidding_state(2, 5);
    assert!(start_new_round(&mut state).is_err());
}

#[test]
fn pause_and_resume_round_trip_the_phase() {
    let mut state = bidding_state(2, 5);
    pause(&mut state).unwrap();
    assert_eq!(state.phase, Phase::Paused);
    assert!(pause(&mut state).is_err(), "cannot pause twice");
    assert!(
        place_bid(&mut state, 0, 2, 3).is_err(),
        "no actions while paused"
    );

    resume(&mut state).unwrap();
    assert_eq!(state.phase, Phase::Bidding);
    assert_eq!(resume(&mut state).unwrap_err(), RuleError::NotPaused);
}

#[test]
fn pause_is_rejected_in_lobby_and_game_over() {
    let mut state = GameState::new(GameConfig::default());
    assert!(pause(&mut state).is_err());
    state.phase = Phase::GameOver;
    assert!(pause(&mut state).is_err());
}

#[test]
fn elimination_is_detected_and_winner_declared() {
    let mut state = bidding_state(2, 1);
    state.players[1].dice.clear();
    check_winner(&mut state);

    assert!(state.players[1].eliminated);
    assert_eq!(state.winner, Some(0));
    assert_eq!(state.phase, Phase::GameOver);
}

#[test]
fn no_winner_while_two_or_more_hold_dice() {
    let mut state = bidding_state(3, 1);
    state.players[2].dice.clear();
    check_winner(&mut state);

    assert!(state.players[2].eliminated);
    assert_eq!(state.winner, None);
    assert_ne!(state.phase, Phase::GameOver);
}
