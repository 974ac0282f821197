//! Decision context handed to AI strategies.

use std::sync::Mutex;

use crate::ai::trait_def::AiError;
use crate::domain::cards::EffectCard;
use crate::domain::dice::{Die, DieKind};
use crate::domain::player_view::TableView;
use crate::domain::state::PlayerId;
use crate::model::OpponentModels;
use crate::probability::ProbabilityEngine;

/// Everything a strategy may consult at a decision point.
///
/// The probability engine caches PMFs and so needs `&mut` access; it is
/// shared behind a `Mutex` since strategies take `&self`.
pub struct DecisionContext<'a> {
    pub view: &'a TableView,
    pub models: &'a OpponentModels,
    /// Opponent dice revealed to this viewer (e.g. by a peek), pinned as
    /// certain information.
    pub known_dice: &'a [(PlayerId, Die)],
    pub engine: &'a Mutex<ProbabilityEngine>,
}

impl<'a> DecisionContext<'a> {
    /// Known opponent dice matching `face` (wild rule applied).
    pub fn known_matching(&self, face: u8) -> usize {
        self.known_dice.iter().filter(|(_, d)| d.matches(face)).count()
    }

    /// Die kinds that are neither the viewer's own nor revealed.
    pub fn hidden_kinds(&self) -> Vec<DieKind> {
        let mut pool = self.view.unknown_kinds();
        for (_, die) in self.known_dice {
            if let Some(pos) = pool.iter().position(|&k| k == die.kind) {
                pool.swap_remove(pos);
            }
        }
        pool
    }

    /// P(the table holds at least `quantity` of `face`), counting the
    /// viewer's own and revealed dice as certain.
    pub fn bid_probability(&self, quantity: u32, face: u8) -> Result<f64, AiError> {
        let certain = (self.view.own_matching(face) + self.known_matching(face)) as u32;
        let needed = quantity.saturating_sub(certain);
        if needed == 0 {
            return Ok(1.0);
        }
        let mut engine = self.lock_engine()?;
        Ok(engine.at_least_over(&self.hidden_kinds(), face, needed))
    }

    /// P(the table holds exactly `quantity` of `face`).
    pub fn exact_probability(&self, quantity: u32, face: u8) -> Result<f64, AiError> {
        let certain = (self.view.own_matching(face) + self.known_matching(face)) as u32;
        if certain > quantity {
            return Ok(0.0);
        }
        let mut engine = self.lock_engine()?;
        Ok(engine.exactly_over(&self.hidden_kinds(), face, quantity - certain))
    }

    /// Cards the viewer could legally play right now, with a representative
    /// target filled in where one is required.
    pub fn playable_cards(&self) -> Vec<(EffectCard, Option<PlayerId>)> {
        let target = self
            .view
            .players
            .iter()
            .find(|p| !p.eliminated && p.id != self.view.viewer)
            .map(|p| p.id);
        self.view
            .own_cards
            .iter()
            .filter_map(|&card| {
                if card.needs_target() {
                    target.map(|t| (card, Some(t)))
                } else {
                    Some((card, None))
                }
            })
            .collect()
    }

    fn lock_engine(&self) -> Result<std::sync::MutexGuard<'a, ProbabilityEngine>, AiError> {
        self.engine
            .lock()
            .map_err(|e| AiError::Internal(format!("probability engine lock poisoned: {e}")))
    }
}
