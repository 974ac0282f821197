//! Information-set Monte Carlo tree search over the bidding decision.
//!
//! The searcher never sees hidden dice. Each iteration samples a concrete
//! world consistent with the information set (a determinization): hidden die
//! kinds are drawn from the public pool and faces are sampled per kind,
//! skewed toward each opponent's learned face preference. Candidate actions
//! at the root are picked by UCB1 and scored against that world; bids are
//! scored by a short rollout of simplified raise-or-dudo opponents.
//!
//! Budgets are wall-clock and iteration-count, whichever ends first. The
//! returned action is the most visited one; its confidence is its win rate.

use std::collections::HashMap;
use std::time::Instant;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{AiAction, Decision};
use crate::domain::bids::{min_raise_quantity, Bid};
use crate::domain::cards::EffectCard;
use crate::domain::dice::{Die, DieKind, FACES};
use crate::domain::player_view::TableView;
use crate::domain::state::PlayerId;
use crate::search::worker::SearchError;

/// Search budgets and tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Wall-clock budget for one decision.
    pub time_budget_ms: u64,
    /// Iteration cap; the search stops early when it is reached.
    pub target_iterations: u32,
    /// UCB1 exploration constant.
    pub exploration: f64,
    /// Rollout depth in plies when evaluating a bid.
    pub rollout_depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 5_000,
            target_iterations: 20_000,
            exploration: 0.7,
            rollout_depth: 4,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.time_budget_ms == 0 {
            return Err(SearchError::InvalidConfig("time budget must be positive".into()));
        }
        if self.target_iterations == 0 {
            return Err(SearchError::InvalidConfig(
                "iteration target must be positive".into(),
            ));
        }
        if !(self.exploration.is_finite() && self.exploration > 0.0) {
            return Err(SearchError::InvalidConfig(
                "exploration constant must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// What the opponent model exports into a (serializable) search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentSnapshot {
    pub bluff_frequency: f64,
    pub aggressiveness: f64,
    pub face_preference: [f64; FACES],
}

impl Default for OpponentSnapshot {
    fn default() -> Self {
        Self {
            bluff_frequency: 0.5,
            aggressiveness: 0.3,
            face_preference: [1.0; FACES],
        }
    }
}

/// Everything the search needs, detached from live game state so it can
/// cross a channel to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchContext {
    pub view: TableView,
    /// Opponent dice revealed to the viewer, pinned in every determinization.
    pub known_dice: Vec<(PlayerId, Die)>,
    pub opponents: HashMap<PlayerId, OpponentSnapshot>,
    /// Seed for the determinization stream; same seed, same search.
    pub seed: u64,
}

/// Search result plus how much work it took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub decision: Decision,
    pub iterations_completed: u32,
    pub time_spent_ms: u64,
}

struct Arm {
    action: AiAction,
    visits: u32,
    wins: f64,
}

/// A sampled assignment of concrete dice to every seat.
struct World {
    dice: Vec<(PlayerId, Vec<Die>)>,
}

impl World {
    fn tally(&self, face: u8) -> u32 {
        self.dice
            .iter()
            .flat_map(|(_, dice)| dice.iter())
            .filter(|d| d.matches(face))
            .count() as u32
    }

    fn total(&self) -> u32 {
        self.dice.iter().map(|(_, d)| d.len() as u32).sum()
    }
}

/// Run one budgeted search. Fails fast on an invalid config or a context
/// with no legal actions.
pub fn run_search(ctx: &SearchContext, config: &SearchConfig) -> Result<SearchOutcome, SearchError> {
    config.validate()?;
    let candidates = enumerate_candidates(&ctx.view);
    if candidates.is_empty() {
        return Err(SearchError::NoActions);
    }

    let started = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(ctx.seed);
    let mut arms: Vec<Arm> = candidates
        .into_iter()
        .map(|action| Arm {
            action,
            visits: 0,
            wins: 0.0,
        })
        .collect();

    let mut iterations = 0u32;
    while iterations < config.target_iterations {
        if started.elapsed().as_millis() as u64 >= config.time_budget_ms {
            break;
        }
        let world = determinize(ctx, &mut rng);
        let pick = select_arm(&arms, iterations, config.exploration);
        let value = evaluate(&arms[pick].action, ctx, &world, config, &mut rng);
        arms[pick].visits += 1;
        arms[pick].wins += value;
        iterations += 1;
    }

    let best = arms
        .iter()
        .max_by_key(|arm| arm.visits)
        .ok_or(SearchError::NoActions)?;
    let confidence = if best.visits > 0 {
        best.wins / best.visits as f64
    } else {
        0.0
    };
    let outcome = SearchOutcome {
        decision: Decision::new(best.action, confidence),
        iterations_completed: iterations,
        time_spent_ms: started.elapsed().as_millis() as u64,
    };
    tracing::debug!(
        iterations,
        time_spent_ms = outcome.time_spent_ms,
        action = ?outcome.decision.action,
        confidence = outcome.decision.confidence,
        "search finished"
    );
    Ok(outcome)
}

/// All root actions worth considering: every legal raise, challenge and
/// exact claim once a bid stands, and every legal card parameterization.
fn enumerate_candidates(view: &TableView) -> Vec<AiAction> {
    let mut candidates = Vec::new();
    for (quantity, face) in view.legal_raises() {
        candidates.push(AiAction::Bid { quantity, face });
    }
    if view.current_bid.is_some() {
        candidates.push(AiAction::Challenge);
        candidates.push(AiAction::ExactClaim);
    }
    let targets: Vec<PlayerId> = view
        .players
        .iter()
        .filter(|p| !p.eliminated && p.id != view.viewer)
        .map(|p| p.id)
        .collect();
    for &card in &view.own_cards {
        if card.needs_target() {
            for &target in &targets {
                candidates.push(AiAction::PlayCard {
                    card,
                    target: Some(target),
                });
            }
        } else {
            candidates.push(AiAction::PlayCard { card, target: None });
        }
    }
    candidates
}

/// UCB1 with unvisited-first priority.
fn select_arm(arms: &[Arm], total_iterations: u32, exploration: f64) -> usize {
    if let Some(unvisited) = arms.iter().position(|a| a.visits == 0) {
        return unvisited;
    }
    let ln_total = f64::from(total_iterations.max(1)).ln();
    let mut best = 0;
    let mut best_score = f64::MIN;
    for (i, arm) in arms.iter().enumerate() {
        let mean = arm.wins / arm.visits as f64;
        let score = mean + exploration * (ln_total / arm.visits as f64).sqrt();
        if score > best_score {
            best_score = score;
            best = i;
        }
    }
    best
}

/// Sample one concrete world: hidden kinds are dealt from the public pool,
/// faces drawn per kind weighted by the owner's face preference, and any
/// revealed dice pinned exactly.
fn determinize(ctx: &SearchContext, rng: &mut ChaCha8Rng) -> World {
    let view = &ctx.view;
    let mut pool = view.unknown_kinds();
    for (_, die) in &ctx.known_dice {
        if let Some(pos) = pool.iter().position(|&k| k == die.kind) {
            pool.swap_remove(pos);
        }
    }
    pool.shuffle(rng);

    let mut dice = Vec::new();
    for player in view.players.iter().filter(|p| !p.eliminated) {
        if player.id == view.viewer {
            dice.push((player.id, view.own_dice.clone()));
            continue;
        }
        let mut hand: Vec<Die> = ctx
            .known_dice
            .iter()
            .filter(|(owner, _)| *owner == player.id)
            .map(|(_, die)| *die)
            .collect();
        let preference = ctx
            .opponents
            .get(&player.id)
            .map(|s| s.face_preference)
            .unwrap_or([1.0; FACES]);
        while hand.len() < player.die_count {
            let Some(kind) = pool.pop() else { break };
            hand.push(Die {
                kind,
                value: sample_face(kind, &preference, rng),
            });
        }
        dice.push((player.id, hand));
    }
    World { dice }
}

/// Draw a face from a kind's table, re-weighted by the owner's preference.
/// Preference shifts which faces they keep after rerolls and upgrades only
/// mildly, so weights blend toward uniform.
fn sample_face(kind: DieKind, preference: &[f64; FACES], rng: &mut ChaCha8Rng) -> u8 {
    let table = kind.face_table();
    let weights: Vec<f64> = table
        .iter()
        .map(|&v| {
            let pref = preference.get(v as usize - 1).copied().unwrap_or(1.0);
            1.0 + 0.25 * (pref - 1.0)
        })
        .collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return table[rng.random_range(0..table.len())];
    }
    let mut roll = rng.random_range(0.0..total);
    for (i, w) in weights.iter().enumerate() {
        roll -= w;
        if roll <= 0.0 {
            return table[i];
        }
    }
    table[table.len() - 1]
}

/// Score a candidate against one determinized world, in [0, 1].
fn evaluate(
    action: &AiAction,
    ctx: &SearchContext,
    world: &World,
    config: &SearchConfig,
    rng: &mut ChaCha8Rng,
) -> f64 {
    match action {
        AiAction::Challenge => match ctx.view.current_bid {
            Some(bid) if world.tally(bid.face) < bid.quantity => 1.0,
            Some(_) => 0.0,
            None => 0.0,
        },
        AiAction::ExactClaim => match ctx.view.current_bid {
            Some(bid) if world.tally(bid.face) == bid.quantity => 1.0,
            Some(_) => 0.0,
            None => 0.0,
        },
        AiAction::Bid { quantity, face } => rollout_bid(
            Bid {
                bidder: ctx.view.viewer,
                quantity: *quantity,
                face: *face,
            },
            ctx,
            world,
            config,
            rng,
        ),
        AiAction::PlayCard { card, .. } => card_value(*card, ctx, world),
    }
}

/// Bounded rollout after placing `bid`: simplified opponents either dudo the
/// standing bid or raise minimally onto their preferred face. Our payoff is
/// whether the eventually challenged bid (ours or a later one) survives from
/// our side of the table.
fn rollout_bid(
    bid: Bid,
    ctx: &SearchContext,
    world: &World,
    config: &SearchConfig,
    rng: &mut ChaCha8Rng,
) -> f64 {
    let total = world.total().max(1);
    let mut current = bid;

    for _ in 0..config.rollout_depth {
        // An opponent challenges when the claim outruns a noisy estimate of
        // one third of the table.
        let estimate = total as f64 / 3.0 + rng.random_range(-0.5..0.5);
        if current.quantity as f64 > estimate {
            let holds = world.tally(current.face) >= current.quantity;
            return if current.bidder == ctx.view.viewer {
                if holds {
                    1.0
                } else {
                    0.0
                }
            } else if holds {
                0.25
            } else {
                0.75
            };
        }

        // Otherwise a minimal raise on a random non-wild face.
        let face = 2 + rng.random_range(0..(FACES as u8 - 1));
        let quantity = min_raise_quantity(Some(&current), face);
        if quantity > total {
            let holds = world.tally(current.face) >= current.quantity;
            return if holds { 0.6 } else { 0.4 };
        }
        current = Bid {
            bidder: u8::MAX, // some opponent; only "not us" matters
            quantity,
            face,
        };
    }

    // Nobody challenged within the horizon; a truthful bid is mild upside.
    if world.tally(bid.face) >= bid.quantity {
        0.6
    } else {
        0.45
    }
}

/// Flat heuristic values per card in the current spot. Cards do not resolve
/// dice, so their worth is positional rather than world-dependent.
fn card_value(card: EffectCard, ctx: &SearchContext, world: &World) -> f64 {
    let view = &ctx.view;
    match card {
        EffectCard::Insurance => {
            // Worth most when a challenge looks tempting but uncertain.
            match view.current_bid {
                Some(bid) => {
                    let short = world.tally(bid.face) < bid.quantity;
                    if short {
                        0.6
                    } else {
                        0.45
                    }
                }
                None => 0.3,
            }
        }
        EffectCard::DoubleStakes => match view.current_bid {
            Some(bid) if world.tally(bid.face) < bid.quantity => 0.65,
            _ => 0.25,
        },
        EffectCard::PhantomBid => 0.4,
        EffectCard::LateChallenge => {
            if view.previous_bids.is_empty() {
                0.2
            } else {
                0.45
            }
        }
        EffectCard::Peek => 0.5,
        EffectCard::Reroll => 0.45,
        EffectCard::UpgradeDie => 0.5,
        EffectCard::DowngradeDie => 0.45,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bids::place_bid;
    use crate::domain::fixtures::{bidding_state, bidding_state_with_faces};
    use crate::domain::player_view::table_view;

    fn context(state: &crate::domain::state::GameState, viewer: u8, seed: u64) -> SearchContext {
        SearchContext {
            view: table_view(state, viewer).unwrap(),
            known_dice: Vec::new(),
            opponents: HashMap::new(),
            seed,
        }
    }

    fn quick_config() -> SearchConfig {
        SearchConfig {
            time_budget_ms: 200,
            target_iterations: 2_000,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn ucb1_prefers_unvisited_arms() {
        let arms = vec![
            Arm {
                action: AiAction::Challenge,
                visits: 10,
                wins: 10.0,
            },
            Arm {
                action: AiAction::ExactClaim,
                visits: 0,
                wins: 0.0,
            },
        ];
        assert_eq!(select_arm(&arms, 10, 0.7), 1);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut config = SearchConfig::default();
        config.time_budget_ms = 0;
        assert!(config.validate().is_err());

        let mut config = SearchConfig::default();
        config.exploration = -1.0;
        assert!(config.validate().is_err());

        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn search_is_deterministic_per_seed() {
        let mut state = bidding_state(3, 4);
        place_bid(&mut state, 0, 3, 4).unwrap();
        let ctx = context(&state, 1, 99);
        let config = SearchConfig {
            time_budget_ms: 10_000, // iteration-bound, not time-bound
            target_iterations: 500,
            ..SearchConfig::default()
        };

        let a = run_search(&ctx, &config).unwrap();
        let b = run_search(&ctx, &config).unwrap();
        assert_eq!(a.decision.action, b.decision.action);
        assert_eq!(a.iterations_completed, b.iterations_completed);
    }

    #[test]
    fn hopeless_bids_get_challenged() {
        // Claim of 6 sixes with 6 dice on the table; the viewer holds none.
        let mut state = bidding_state_with_faces(&[&[2, 3, 5], &[2, 3, 5]]);
        place_bid(&mut state, 0, 6, 6).unwrap();
        let ctx = context(&state, 1, 7);

        let outcome = run_search(&ctx, &quick_config()).unwrap();
        assert_eq!(outcome.decision.action, AiAction::Challenge);
        assert!(outcome.decision.confidence > 0.8);
        assert!(outcome.iterations_completed > 0);
    }

    #[test]
    fn candidates_cover_challenges_and_cards_once_a_bid_stands() {
        let mut state = bidding_state(3, 4);
        state.players[1].cards.push(EffectCard::Peek);
        place_bid(&mut state, 0, 2, 3).unwrap();
        let view = table_view(&state, 1).unwrap();

        let candidates = enumerate_candidates(&view);
        assert!(candidates.contains(&AiAction::Challenge));
        assert!(candidates.contains(&AiAction::ExactClaim));
        // Peek needs a target: one candidate per live opponent.
        let peeks = candidates
            .iter()
            .filter(|a| matches!(a, AiAction::PlayCard { card: EffectCard::Peek, .. }))
            .count();
        assert_eq!(peeks, 2);
        assert!(candidates
            .iter()
            .any(|a| matches!(a, AiAction::Bid { .. })));
    }

    #[test]
    fn determinization_respects_die_counts_and_known_dice() {
        let state = bidding_state(3, 4);
        let mut ctx = context(&state, 0, 5);
        let pinned = Die {
            kind: DieKind::D6,
            value: 6,
        };
        ctx.known_dice.push((1, pinned));

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..20 {
            let world = determinize(&ctx, &mut rng);
            assert_eq!(world.total(), 12);
            for (player, dice) in &world.dice {
                assert_eq!(dice.len(), 4, "seat {player}");
            }
            let (_, hand) = world.dice.iter().find(|(p, _)| *p == 1).unwrap();
            assert!(hand.contains(&pinned));
        }
    }
}
