//! Effect cards and the one-shot active-effect flags they arm.
//!
//! Cards are played during bidding on the holder's turn and do not consume
//! the turn. Flag cards arm an effect consumed by exactly one future action;
//! dice cards mutate dice immediately. Cosmetic wording is out of scope.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::dice::Die;
use crate::domain::errors::RuleError;
use crate::domain::state::{GameState, Phase, PlayerId};

/// The card catalogue, named by effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCard {
    /// Zeroes the holder's dice loss on their own failed challenge.
    Insurance,
    /// Doubles the dice loss of whichever side armed it, if they lose.
    DoubleStakes,
    /// The holder's next bid bypasses raise legality.
    PhantomBid,
    /// Permits challenging a prior bid from the previous-bids log.
    LateChallenge,
    /// Reveals one random die of the target to the holder.
    Peek,
    /// Rerolls all of the target's dice.
    Reroll,
    /// Upgrades the holder's smallest die to the next larger kind.
    UpgradeDie,
    /// Downgrades the target's largest die to the next smaller kind.
    DowngradeDie,
}

impl EffectCard {
    pub const ALL: [EffectCard; 8] = [
        EffectCard::Insurance,
        EffectCard::DoubleStakes,
        EffectCard::PhantomBid,
        EffectCard::LateChallenge,
        EffectCard::Peek,
        EffectCard::Reroll,
        EffectCard::UpgradeDie,
        EffectCard::DowngradeDie,
    ];

    /// Whether playing this card requires an opponent target.
    pub fn needs_target(self) -> bool {
        matches!(
            self,
            EffectCard::Peek | EffectCard::Reroll | EffectCard::DowngradeDie
        )
    }
}

/// One-shot flags consumed by exactly one future action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub insurance: bool,
    pub double_stakes: bool,
    pub phantom_bid: bool,
    pub late_challenge: bool,
}

impl ActiveEffects {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// State changes produced by playing a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPlayed {
    pub player: PlayerId,
    pub card: EffectCard,
    pub target: Option<PlayerId>,
    /// Die revealed to the player by `Peek`, if any. The session layer is
    /// responsible for showing this to the playing seat only.
    pub revealed: Option<(PlayerId, Die)>,
}

/// Draw a random card from the catalogue (Mixed mode dice-loss award).
pub fn draw_card(rng: &mut impl Rng) -> EffectCard {
    *EffectCard::ALL
        .choose(rng)
        .unwrap_or(&EffectCard::Insurance)
}

/// Play a held card, enforcing phase, turn, possession, and targeting.
///
/// Playing a card never advances the turn.
pub fn play_card(
    state: &mut GameState,
    who: PlayerId,
    card: EffectCard,
    target: Option<PlayerId>,
    rng: &mut impl Rng,
) -> Result<CardPlayed, RuleError> {
    if state.phase != Phase::Bidding {
        return Err(RuleError::PhaseMismatch {
            expected: "bidding",
        });
    }
    let turn = state
        .current_player()
        .ok_or_else(|| RuleError::other("no player can act"))?;
    if turn != who {
        return Err(RuleError::NotYourTurn);
    }

    // Validate the target before any mutation.
    let target = if card.needs_target() {
        let t = target.ok_or(RuleError::TargetRequired)?;
        let p = state.player(t).ok_or(RuleError::UnknownPlayer(t))?;
        if p.eliminated || t == who {
            return Err(RuleError::UnknownPlayer(t));
        }
        Some(t)
    } else {
        None
    };

    let holder = state.player(who).ok_or(RuleError::UnknownPlayer(who))?;
    let pos = holder
        .cards
        .iter()
        .position(|&c| c == card)
        .ok_or(RuleError::CardNotHeld)?;

    let mut revealed = None;
    match card {
        EffectCard::Insurance => state.players[who as usize].effects.insurance = true,
        EffectCard::DoubleStakes => state.players[who as usize].effects.double_stakes = true,
        EffectCard::PhantomBid => state.players[who as usize].effects.phantom_bid = true,
        EffectCard::LateChallenge => state.players[who as usize].effects.late_challenge = true,
        EffectCard::Peek => {
            let t = target.ok_or(RuleError::TargetRequired)?;
            let dice = &state.players[t as usize].dice;
            if let Some(&die) = dice.choose(rng) {
                revealed = Some((t, die));
            }
        }
        EffectCard::Reroll => {
            let t = target.ok_or(RuleError::TargetRequired)?;
            for die in state.players[t as usize].dice.iter_mut() {
                die.roll(rng);
            }
        }
        EffectCard::UpgradeDie => {
            let dice = &mut state.players[who as usize].dice;
            if let Some(die) = dice.iter_mut().min_by_key(|d| d.kind) {
                die.kind = die.kind.upgraded();
                die.roll(rng);
            }
        }
        EffectCard::DowngradeDie => {
            let t = target.ok_or(RuleError::TargetRequired)?;
            let dice = &mut state.players[t as usize].dice;
            if let Some(die) = dice.iter_mut().max_by_key(|d| d.kind) {
                die.kind = die.kind.downgraded();
                die.roll(rng);
            }
        }
    }

    state.players[who as usize].cards.remove(pos);
    tracing::debug!(player = who, ?card, ?target, "card played");

    Ok(CardPlayed {
        player: who,
        card,
        target,
        revealed,
    })
}
