//! Strategic — the Expert tier. Search first, graceful degradation after.
//!
//! The decision ladder:
//! 1. dispatch the full-budget search to the shared worker;
//! 2. on worker failure or timeout, run a reduced search inline;
//! 3. if even that fails, fall back to a fixed heuristic (modest opening
//!    bid, or challenge once the claim covers most of the table).
//!
//! Compute failures are logged and absorbed here; callers always get a
//! decision or a genuine rule-level error.

use std::sync::Arc;

use super::trait_def::{AiAction, AiError, AiStrategy, Decision};
use super::DecisionContext;
use crate::domain::bids::min_raise_quantity;
use crate::domain::dice::FACES;
use crate::search::ismcts::{run_search, OpponentSnapshot, SearchConfig, SearchContext};
use crate::search::worker::{SearchDispatcher, SearchRequest};

/// Inline retry budget: a quarter of the main budget, capped.
const INLINE_CAP_MS: u64 = 500;

/// Static fallback challenges when the claim covers this share of the table.
const FALLBACK_CHALLENGE_RATIO: f64 = 0.6;

pub struct Strategic {
    dispatcher: Option<Arc<SearchDispatcher>>,
    config: SearchConfig,
    seed: u64,
}

impl Strategic {
    pub const NAME: &'static str = "Strategic";
    pub const VERSION: &'static str = "1.0.0";

    /// Create an expert with its own worker. A failed worker spawn is not
    /// fatal; the tier then lives on the inline ladder.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_config(seed, SearchConfig::default())
    }

    pub fn with_config(seed: Option<u64>, config: SearchConfig) -> Self {
        let dispatcher = match SearchDispatcher::spawn() {
            Ok(d) => Some(Arc::new(d)),
            Err(e) => {
                tracing::warn!(error = %e, "search worker unavailable, using inline search");
                None
            }
        };
        Self {
            dispatcher,
            config,
            seed: seed.unwrap_or(0x5712a7e61c),
        }
    }

    /// Share a dispatcher across strategies (one worker per process is
    /// usually enough).
    pub fn with_dispatcher(
        seed: Option<u64>,
        config: SearchConfig,
        dispatcher: Arc<SearchDispatcher>,
    ) -> Self {
        Self {
            dispatcher: Some(dispatcher),
            config,
            seed: seed.unwrap_or(0x5712a7e61c),
        }
    }

    fn search_context(&self, ctx: &DecisionContext<'_>) -> SearchContext {
        let opponents = ctx
            .view
            .players
            .iter()
            .filter(|p| p.id != ctx.view.viewer)
            .filter_map(|p| {
                ctx.models.get(p.id).map(|m| {
                    (
                        p.id,
                        OpponentSnapshot {
                            bluff_frequency: m.bluff_frequency,
                            aggressiveness: m.aggressiveness,
                            face_preference: m.face_preference,
                        },
                    )
                })
            })
            .collect();
        SearchContext {
            view: ctx.view.clone(),
            known_dice: ctx.known_dice.to_vec(),
            opponents,
            seed: self
                .seed
                .wrapping_mul(0x9e37_79b9_7f4a_7c15)
                .wrapping_add(u64::from(ctx.view.round_no)),
        }
    }

    /// Step 2: reduced synchronous search on the calling thread.
    fn inline_search(&self, search_ctx: &SearchContext) -> Result<Decision, AiError> {
        let config = SearchConfig {
            time_budget_ms: (self.config.time_budget_ms / 4).clamp(1, INLINE_CAP_MS),
            target_iterations: (self.config.target_iterations / 4).max(1),
            ..self.config
        };
        run_search(search_ctx, &config)
            .map(|outcome| outcome.decision)
            .map_err(|e| AiError::Internal(format!("inline search failed: {e}")))
    }

    /// Step 3: no search at all. Open modestly on the best-held face, or
    /// challenge once the standing claim covers most of the dice in play.
    fn static_fallback(ctx: &DecisionContext<'_>) -> Result<Decision, AiError> {
        let view = ctx.view;
        if let Some(bid) = &view.current_bid {
            let total = view.total_dice.max(1) as f64;
            if bid.quantity as f64 > total * FALLBACK_CHALLENGE_RATIO {
                return Ok(Decision::new(AiAction::Challenge, 0.5));
            }
        }
        let raises = view.legal_raises();
        let face = (1..=FACES as u8)
            .max_by_key(|&f| view.own_matching(f))
            .unwrap_or(2);
        let quantity = min_raise_quantity(view.current_bid.as_ref(), face);
        if raises.contains(&(quantity, face)) {
            return Ok(Decision::new(AiAction::Bid { quantity, face }, 0.4));
        }
        match raises.first() {
            Some(&(quantity, face)) => Ok(Decision::new(AiAction::Bid { quantity, face }, 0.3)),
            None if view.current_bid.is_some() => {
                Ok(Decision::new(AiAction::Challenge, 0.4))
            }
            None => Err(AiError::InvalidMove("no legal actions available".into())),
        }
    }
}

impl AiStrategy for Strategic {
    fn decide(&self, ctx: &DecisionContext<'_>) -> Result<Decision, AiError> {
        let search_ctx = self.search_context(ctx);

        if let Some(dispatcher) = &self.dispatcher {
            let request = SearchRequest {
                context: search_ctx.clone(),
                time_budget_ms: self.config.time_budget_ms,
                target_iterations: self.config.target_iterations,
            };
            match dispatcher.dispatch_blocking(request) {
                Ok(response) => return Ok(response.decision),
                Err(e) => {
                    tracing::warn!(error = %e, "worker search failed, trying inline");
                }
            }
        }

        match self.inline_search(&search_ctx) {
            Ok(decision) => Ok(decision),
            Err(e) => {
                tracing::warn!(error = %e, "inline search failed, using static fallback");
                Self::static_fallback(ctx)
            }
        }
    }
}
