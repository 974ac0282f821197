//! Redacted projections of game state.
//!
//! `TableView` is what a seated viewer (human or AI) may see: every other
//! player's dice are reduced to counts, while the multiset of die kinds in
//! play stays public (upgrades and downgrades happen on the table). The
//! viewer's own dice and cards are included in full.

use serde::{Deserialize, Serialize};

use crate::domain::bids::{legal_raises, Bid};
use crate::domain::cards::EffectCard;
use crate::domain::dice::{Die, DieKind};
use crate::domain::errors::RuleError;
use crate::domain::state::{GameState, Phase, PlayerId};

/// Public info about a single seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    pub die_count: usize,
    pub card_count: usize,
    pub eliminated: bool,
    pub is_ai: bool,
}

/// Everything a seated viewer may see at a decision point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub viewer: PlayerId,
    pub phase: Phase,
    pub round_no: u32,
    pub players: Vec<PlayerPublic>,
    /// Seat expected to act, if anyone.
    pub to_act: Option<PlayerId>,
    pub current_bid: Option<Bid>,
    pub previous_bids: Vec<Bid>,
    pub total_dice: usize,
    /// Multiset of every die kind in play, viewer's own included.
    pub kind_pool: Vec<DieKind>,
    pub own_dice: Vec<Die>,
    pub own_cards: Vec<EffectCard>,
    pub winner: Option<PlayerId>,
}

impl TableView {
    /// Count of the viewer's own dice matching `face` (wild rule applied).
    pub fn own_matching(&self, face: u8) -> usize {
        self.own_dice.iter().filter(|d| d.matches(face)).count()
    }

    /// Die kinds in play that are not the viewer's own.
    pub fn unknown_kinds(&self) -> Vec<DieKind> {
        let mut pool = self.kind_pool.clone();
        for die in &self.own_dice {
            if let Some(pos) = pool.iter().position(|&k| k == die.kind) {
                pool.swap_remove(pos);
            }
        }
        pool
    }

    /// Every legal raise for the viewer, capped at the dice in play.
    pub fn legal_raises(&self) -> Vec<(u32, u8)> {
        legal_raises(self.current_bid.as_ref(), self.total_dice.max(1) as u32)
    }
}

/// Build the redacted view for a seated viewer.
pub fn table_view(state: &GameState, viewer: PlayerId) -> Result<TableView, RuleError> {
    let own = state
        .player(viewer)
        .ok_or(RuleError::UnknownPlayer(viewer))?;

    let players = state
        .players
        .iter()
        .map(|p| PlayerPublic {
            id: p.id,
            name: p.name.clone(),
            die_count: p.die_count(),
            card_count: p.cards.len(),
            eliminated: p.eliminated,
            is_ai: p.is_ai,
        })
        .collect();

    let kind_pool = state
        .players
        .iter()
        .filter(|p| !p.eliminated)
        .flat_map(|p| p.dice.iter().map(|d| d.kind))
        .collect();

    Ok(TableView {
        viewer,
        phase: state.phase,
        round_no: state.round_no,
        players,
        to_act: state.current_player(),
        current_bid: state.current_bid,
        previous_bids: state.previous_bids.clone(),
        total_dice: state.total_dice(),
        kind_pool,
        own_dice: own.dice.clone(),
        own_cards: own.cards.clone(),
        winner: state.winner,
    })
}
