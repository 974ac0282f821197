//! Game phases, players, and the aggregate game state.
//!
//! `GameState` is the single source of truth, owned exclusively by the rules
//! state machine. One command is fully applied before the next is accepted;
//! independent game instances share no mutable state. Every other component
//! receives read-only projections ([`crate::domain::player_view`]).

use serde::{Deserialize, Serialize};

use crate::domain::bids::Bid;
use crate::domain::cards::{ActiveEffects, EffectCard};
use crate::domain::challenge::ChallengeResult;
use crate::domain::dice::{Die, DieKind};
use crate::domain::errors::RuleError;

pub type PlayerId = u8;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Overall game progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Game created, players joining, not yet started.
    Lobby,
    /// Dice are (re-)rolled for the round.
    Rolling,
    /// Players escalate bids in turn order.
    Bidding,
    /// A challenge or exact claim has been called and tallied.
    ChallengeCalled,
    /// Round resolved; waiting for the next round to start.
    RoundEnd,
    /// Game suspended; the pre-pause phase is recorded on the state.
    Paused,
    /// Terminal: exactly one player holds dice.
    GameOver,
}

/// Dice dealing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Six-sided dice only, no effect cards.
    Classic,
    /// Random die kinds; cards are awarded on dice loss.
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    pub dice_per_player: usize,
    /// Maximum effect cards a player may hold.
    pub max_cards: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            dice_per_player: 5,
            max_cards: 2,
        }
    }
}

impl GameConfig {
    /// Kind of a freshly granted die (exact-claim reward).
    pub fn base_kind(&self) -> DieKind {
        DieKind::D6
    }
}

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    /// Owned dice; emptied exactly when the player is eliminated.
    pub dice: Vec<Die>,
    /// Held effect cards, bounded by `GameConfig::max_cards`.
    pub cards: Vec<EffectCard>,
    pub effects: ActiveEffects,
    /// True iff `dice` is empty; irreversible within a round.
    pub eliminated: bool,
    pub is_ai: bool,
}

impl PlayerState {
    pub fn new(id: PlayerId, name: impl Into<String>, is_ai: bool) -> Self {
        Self {
            id,
            name: name.into(),
            dice: Vec::new(),
            cards: Vec::new(),
            effects: ActiveEffects::default(),
            eliminated: false,
            is_ai,
        }
    }

    pub fn die_count(&self) -> usize {
        self.dice.len()
    }
}

/// Entire game container, sufficient for pure domain operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: Phase,
    pub config: GameConfig,
    /// Seat-ordered players; `PlayerId` doubles as the index.
    pub players: Vec<PlayerState>,
    /// Index into `players` of the seat expected to act. Advancing skips
    /// eliminated seats.
    pub turn_index: usize,
    pub current_bid: Option<Bid>,
    /// Superseded bids of the current round, oldest first.
    pub previous_bids: Vec<Bid>,
    /// 1-based once the game starts.
    pub round_no: u32,
    pub winner: Option<PlayerId>,
    /// Seeds the next round's starting player.
    pub last_challenge: Option<ChallengeResult>,
    /// Phase recorded by `pause`, restored by `resume`.
    pub paused_from: Option<Phase>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            phase: Phase::Lobby,
            config,
            players: Vec::new(),
            turn_index: 0,
            current_bid: None,
            previous_bids: Vec::new(),
            round_no: 0,
            winner: None,
            last_challenge: None,
            paused_from: None,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(id as usize)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(id as usize)
    }

    /// Seats still holding dice, in table order.
    pub fn active_seats(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| !p.eliminated)
            .map(|p| p.id)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| !p.eliminated).count()
    }

    /// Total dice in play across all active seats.
    pub fn total_dice(&self) -> usize {
        self.players
            .iter()
            .filter(|p| !p.eliminated)
            .map(|p| p.die_count())
            .sum()
    }

    /// The seat expected to act, or None when nobody can act.
    pub fn current_player(&self) -> Option<PlayerId> {
        if self.players.is_empty() || self.active_count() == 0 {
            return None;
        }
        let n = self.players.len();
        let mut idx = self.turn_index % n;
        for _ in 0..n {
            if !self.players[idx].eliminated {
                return Some(self.players[idx].id);
            }
            idx = (idx + 1) % n;
        }
        None
    }

    /// Advance the turn to the next active seat after the current one.
    pub fn advance_turn(&mut self) {
        let n = self.players.len();
        if n == 0 || self.active_count() == 0 {
            return;
        }
        let current = self.current_player().map(|id| id as usize).unwrap_or(0);
        let mut idx = (current + 1) % n;
        for _ in 0..n {
            if !self.players[idx].eliminated {
                self.turn_index = idx;
                return;
            }
            idx = (idx + 1) % n;
        }
    }

    /// Point the turn at a specific seat (round-start seeding). Falls back
    /// to the next active seat if the requested one is eliminated.
    pub fn set_turn(&mut self, seat: PlayerId) {
        let idx = (seat as usize).min(self.players.len().saturating_sub(1));
        self.turn_index = idx;
        if self
            .players
            .get(idx)
            .map(|p| p.eliminated)
            .unwrap_or(false)
        {
            self.advance_turn();
        }
    }
}

pub fn require_current_bid(state: &GameState) -> Result<Bid, RuleError> {
    state.current_bid.ok_or(RuleError::NoCurrentBid)
}

pub fn require_player<'a>(
    state: &'a GameState,
    id: PlayerId,
) -> Result<&'a PlayerState, RuleError> {
    state.player(id).ok_or(RuleError::UnknownPlayer(id))
}

pub fn require_active(state: &GameState, id: PlayerId) -> Result<(), RuleError> {
    let p = require_player(state, id)?;
    if p.eliminated {
        return Err(RuleError::Eliminated(id));
    }
    Ok(())
}
