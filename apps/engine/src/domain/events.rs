//! Result events emitted after each applied command, for the external
//! layer to broadcast or animate.

use serde::{Deserialize, Serialize};

use crate::domain::bids::Bid;
use crate::domain::cards::CardPlayed;
use crate::domain::challenge::ChallengeResult;
use crate::domain::state::{Phase, PlayerId};

/// Adjacently tagged union of game events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        players: usize,
    },
    RoundStarted {
        round_no: u32,
    },
    DiceRolled {
        round_no: u32,
    },
    BidPlaced {
        bid: Bid,
    },
    CardPlayed(CardPlayed),
    ChallengeResolved(ChallengeResult),
    ExactClaimResolved(ChallengeResult),
    DiceLost {
        player: PlayerId,
        count: usize,
    },
    CardDrawn {
        player: PlayerId,
    },
    PlayerEliminated {
        player: PlayerId,
    },
    GameOver {
        winner: PlayerId,
    },
    Paused,
    Resumed {
        phase: Phase,
    },
}
