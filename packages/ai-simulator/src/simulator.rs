//! In-memory game loop driving the rules engine with AI seats.
//!
//! No transport, no persistence: commands go straight into the domain
//! state machine and events come straight back. Each seat keeps its own
//! opponent models and its own list of peeked dice, exactly the
//! information a real seated client would hold.

use std::sync::Mutex;
use std::time::Instant;

use engine::ai::{AiAction, AiStrategy, DecisionContext};
use engine::domain::cards::EffectCard;
use engine::domain::commands::{apply_command, Command};
use engine::domain::dice::Die;
use engine::domain::events::GameEvent;
use engine::domain::lifecycle::add_player;
use engine::domain::player_view::{table_view, TableView};
use engine::domain::seeds::derive_roll_seed;
use engine::domain::state::{GameConfig, GameMode, GameState, Phase, PlayerId};
use engine::model::OpponentModels;
use engine::probability::ProbabilityEngine;
use engine::EngineError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

/// Hard cap on applied commands per game; a correct engine never gets close.
const MAX_STEPS: u32 = 100_000;

/// Per-seat tallies accumulated from the event stream.
#[derive(Debug, Clone, Default)]
pub struct SeatResult {
    pub bids_placed: u32,
    pub challenges_called: u32,
    pub challenges_won: u32,
    pub exact_claims_called: u32,
    pub exact_claims_won: u32,
    pub cards_played: u32,
    pub dice_lost: u32,
    pub eliminated_in_round: Option<u32>,
    pub decisions_made: u32,
    pub decision_time_ms: f64,
}

#[derive(Debug, Clone)]
pub struct GameResult {
    pub winner: PlayerId,
    pub rounds_played: u32,
    pub seats: Vec<SeatResult>,
}

pub struct Simulator {
    game_seed: u64,
    mode: GameMode,
}

impl Simulator {
    pub fn new(game_seed: u64, mode: GameMode) -> Self {
        Self { game_seed, mode }
    }

    /// Run one game to completion, one AI per seat. Rule violations and
    /// internal stalls surface as [`EngineError`].
    pub fn simulate_game(
        &self,
        ais: &[Box<dyn AiStrategy>],
    ) -> Result<GameResult, EngineError> {
        let n = ais.len();
        let mut state = GameState::new(GameConfig {
            mode: self.mode,
            ..GameConfig::default()
        });
        for seat in 0..n {
            add_player(&mut state, format!("seat{seat}"), true)?;
        }

        let mut rng = StdRng::seed_from_u64(derive_roll_seed(self.game_seed, 0));
        let probabilities = Mutex::new(ProbabilityEngine::new());
        let mut models: Vec<OpponentModels> = (0..n).map(|_| OpponentModels::new()).collect();
        let mut known: Vec<Vec<(PlayerId, Die)>> = vec![Vec::new(); n];
        let mut seats: Vec<SeatResult> = vec![SeatResult::default(); n];

        apply_command(&mut state, 0, Command::Start, &mut rng)?;

        let mut steps = 0u32;
        while state.phase != Phase::GameOver {
            steps += 1;
            if steps > MAX_STEPS {
                return Err(EngineError::internal(
                    "game exceeded the step cap without finishing",
                ));
            }

            let (who, command) = match state.phase {
                Phase::Rolling => (0, Command::RollForRound),
                Phase::RoundEnd => (0, Command::StartNewRound),
                Phase::Bidding => {
                    let seat = state
                        .current_player()
                        .ok_or_else(|| EngineError::internal("no seat can act in bidding phase"))?;
                    let view = table_view(&state, seat)?;
                    let ctx = DecisionContext {
                        view: &view,
                        models: &models[seat as usize],
                        known_dice: &known[seat as usize],
                        engine: &probabilities,
                    };
                    let started = Instant::now();
                    let decided = ais[seat as usize].decide(&ctx);
                    let stats = &mut seats[seat as usize];
                    stats.decisions_made += 1;
                    stats.decision_time_ms += started.elapsed().as_secs_f64() * 1000.0;
                    let action = match decided {
                        Ok(decision) => decision.action,
                        Err(e) => {
                            warn!(seat, error = %e, "ai decision failed, using fallback");
                            fallback_action(&view)
                        }
                    };
                    (seat, command_for(action))
                }
                other => {
                    return Err(EngineError::internal(format!(
                        "simulation stuck in phase {other:?}"
                    )))
                }
            };

            let events = match apply_command(&mut state, who, command, &mut rng) {
                Ok(events) => events,
                Err(e) => {
                    // An AI proposed an illegal move; play safe instead of
                    // aborting the whole game.
                    warn!(seat = who, error = %e, "command rejected, using fallback");
                    let view = table_view(&state, who)?;
                    apply_command(&mut state, who, command_for(fallback_action(&view)), &mut rng)?
                }
            };

            for event in &events {
                record_event(event, &state, &mut seats, &mut models, &mut known);
            }
        }

        let winner = state
            .winner
            .ok_or_else(|| EngineError::internal("game over without a winner"))?;
        debug!(winner, rounds = state.round_no, "game finished");
        Ok(GameResult {
            winner,
            rounds_played: state.round_no,
            seats,
        })
    }
}

fn command_for(action: AiAction) -> Command {
    match action {
        AiAction::Bid { quantity, face } => Command::PlaceBid { quantity, face },
        AiAction::Challenge => Command::CallChallenge { bid_index: None },
        AiAction::ExactClaim => Command::CallExactClaim,
        AiAction::PlayCard { card, target } => Command::PlayCard { card, target },
    }
}

/// Minimal legal move: the lowest raise, or a challenge when the table
/// offers no raise.
fn fallback_action(view: &TableView) -> AiAction {
    match view.legal_raises().first() {
        Some(&(quantity, face)) => AiAction::Bid { quantity, face },
        None => AiAction::Challenge,
    }
}

fn record_event(
    event: &GameEvent,
    state: &GameState,
    seats: &mut [SeatResult],
    models: &mut [OpponentModels],
    known: &mut [Vec<(PlayerId, Die)>],
) {
    match event {
        GameEvent::BidPlaced { bid } => {
            seats[bid.bidder as usize].bids_placed += 1;
        }
        GameEvent::ChallengeResolved(result) => {
            let caller = &mut seats[result.caller as usize];
            caller.challenges_called += 1;
            if result.success {
                caller.challenges_won += 1;
            }
            for model in models.iter_mut() {
                model.update_after_challenge(result, &state.previous_bids, state.round_no);
            }
        }
        GameEvent::ExactClaimResolved(result) => {
            let caller = &mut seats[result.caller as usize];
            caller.exact_claims_called += 1;
            if result.success {
                caller.exact_claims_won += 1;
            }
            for model in models.iter_mut() {
                model.update_after_challenge(result, &state.previous_bids, state.round_no);
            }
        }
        GameEvent::DiceLost { player, count } => {
            seats[*player as usize].dice_lost += *count as u32;
        }
        GameEvent::CardPlayed(played) => {
            seats[played.player as usize].cards_played += 1;
            if let Some((owner, die)) = played.revealed {
                known[played.player as usize].push((owner, die));
            }
            // Cards that alter dice invalidate any peeks at them.
            match played.card {
                EffectCard::Reroll | EffectCard::DowngradeDie => {
                    if let Some(target) = played.target {
                        forget_player(known, target);
                    }
                }
                EffectCard::UpgradeDie => forget_player(known, played.player),
                _ => {}
            }
        }
        GameEvent::PlayerEliminated { player } => {
            seats[*player as usize].eliminated_in_round = Some(state.round_no);
        }
        GameEvent::RoundStarted { .. } => {
            for k in known.iter_mut() {
                k.clear();
            }
        }
        _ => {}
    }
}

fn forget_player(known: &mut [Vec<(PlayerId, Die)>], player: PlayerId) {
    for k in known.iter_mut() {
        k.retain(|(owner, _)| *owner != player);
    }
}
