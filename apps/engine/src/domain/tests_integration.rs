//! Full-game integration tests driven through the command boundary.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::bids::legal_raises;
use crate::domain::commands::{apply_command, Command};
use crate::domain::events::GameEvent;
use crate::domain::lifecycle::add_player;
use crate::domain::state::{GameConfig, GameState, Phase};

/// Drive a full game with a naive policy: challenge once the claim exceeds
/// the dice in play, otherwise make the minimal legal raise.
fn run_game(seed: u64, players: usize) -> (GameState, Vec<GameEvent>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::new(GameConfig::default());
    for i in 0..players {
        add_player(&mut state, format!("p{i}"), true).unwrap();
    }
    apply_command(&mut state, 0, Command::Start, &mut rng).unwrap();

    let mut all_events = Vec::new();
    for _ in 0..10_000 {
        let command = match state.phase {
            Phase::Rolling => Command::RollForRound,
            Phase::RoundEnd => Command::StartNewRound,
            Phase::Bidding => {
                let total = state.total_dice() as u32;
                match state.current_bid {
                    Some(bid) if bid.quantity > total / 2 => {
                        Command::CallChallenge { bid_index: None }
                    }
                    _ => {
                        let raises = legal_raises(state.current_bid.as_ref(), total);
                        let &(quantity, face) =
                            raises.first().expect("a raise or challenge must exist");
                        Command::PlaceBid { quantity, face }
                    }
                }
            }
            Phase::GameOver => break,
            other => panic!("unexpected phase {other:?}"),
        };
        let who = state.current_player().unwrap_or(0);
        let events = apply_command(&mut state, who, command, &mut rng).unwrap();
        all_events.extend(events);
    }
    (state, all_events)
}

#[test]
fn seeded_games_run_to_completion() {
    for seed in [1u64, 7, 42, 1337] {
        for players in [2usize, 3, 6] {
            let (state, events) = run_game(seed, players);
            assert_eq!(state.phase, Phase::GameOver, "seed {seed}, {players}p");
            let winner = state.winner.expect("winner set at game over");
            assert!(!state.players[winner as usize].eliminated);
            assert_eq!(state.active_count(), 1);
            assert!(events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. })));
        }
    }
}

#[test]
fn total_dice_never_increases_across_challenges() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut state = GameState::new(GameConfig::default());
    for i in 0..4 {
        add_player(&mut state, format!("p{i}"), true).unwrap();
    }
    apply_command(&mut state, 0, Command::Start, &mut rng).unwrap();

    let mut before = state.total_dice();
    for _ in 0..10_000 {
        let command = match state.phase {
            Phase::Rolling => Command::RollForRound,
            Phase::RoundEnd => Command::StartNewRound,
            Phase::Bidding => {
                let total = state.total_dice() as u32;
                match state.current_bid {
                    Some(bid) if bid.quantity >= total => {
                        Command::CallChallenge { bid_index: None }
                    }
                    _ => {
                        let raises = legal_raises(state.current_bid.as_ref(), total);
                        let &(quantity, face) = raises.first().unwrap();
                        Command::PlaceBid { quantity, face }
                    }
                }
            }
            Phase::GameOver => break,
            other => panic!("unexpected phase {other:?}"),
        };
        let is_challenge = matches!(command, Command::CallChallenge { .. });
        let who = state.current_player().unwrap_or(0);
        apply_command(&mut state, who, command, &mut rng).unwrap();

        let after = state.total_dice();
        if is_challenge {
            let lost = before - after;
            assert!((1..=2).contains(&lost), "challenge must cost 1 or 2 dice");
        } else {
            assert_eq!(after, before, "only challenges move dice");
        }
        before = after;
    }
    assert_eq!(state.phase, Phase::GameOver);
}

#[test]
fn rule_violations_leave_state_untouched() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut state = GameState::new(GameConfig::default());
    add_player(&mut state, "a", false).unwrap();
    add_player(&mut state, "b", false).unwrap();
    apply_command(&mut state, 0, Command::Start, &mut rng).unwrap();
    apply_command(&mut state, 0, Command::RollForRound, &mut rng).unwrap();

    let before = state.clone();
    // Out-of-turn bid, challenge without a bid, premature round advance.
    assert!(apply_command(
        &mut state,
        1,
        Command::PlaceBid {
            quantity: 2,
            face: 3
        },
        &mut rng
    )
    .is_err());
    assert!(
        apply_command(&mut state, 0, Command::CallChallenge { bid_index: None }, &mut rng).is_err()
    );
    assert!(apply_command(&mut state, 0, Command::StartNewRound, &mut rng).is_err());
    assert_eq!(state, before);
}
