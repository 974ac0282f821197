//! Bayesian-flavoured opponent tracking.
//!
//! Every resolved challenge reveals all hands, which retroactively grades
//! every bid of the ended round as honest or short. Each grading feeds three
//! per-opponent signals:
//!
//! - bluff frequency, an EMA toward 1 when the bid was short of its claim
//! - aggressiveness, an EMA toward the bid's quantity / dice in play
//! - face preference, a per-face weight renormalised periodically to mean 1
//!
//! All three start at neutral priors so early reads stay mild.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::domain::bids::Bid;
use crate::domain::challenge::{tally_reveal, ChallengeResult};
use crate::domain::dice::FACES;
use crate::domain::state::PlayerId;

/// EMA smoothing factor for bluff frequency and aggressiveness.
const EMA_ALPHA: f64 = 0.25;

/// Bid history kept per opponent.
const HISTORY_CAP: usize = 32;

/// Face-preference weights are pulled back to mean 1 every this many updates.
const RENORM_INTERVAL: u32 = 8;

/// One graded bid from a resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedBid {
    pub round_no: u32,
    pub quantity: u32,
    pub face: u8,
    pub was_bluff: bool,
}

/// Learned profile of a single opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentModel {
    /// Fraction of graded bids that were short of their claim, smoothed.
    pub bluff_frequency: f64,
    /// Smoothed quantity-to-table-dice ratio of their bids.
    pub aggressiveness: f64,
    /// Relative weight per face value 1..=6, mean-1 normalised.
    pub face_preference: [f64; FACES],
    history: VecDeque<ObservedBid>,
    updates: u32,
}

impl OpponentModel {
    pub fn new() -> Self {
        Self {
            bluff_frequency: 0.5,
            aggressiveness: 0.3,
            face_preference: [1.0; FACES],
            history: VecDeque::new(),
            updates: 0,
        }
    }

    /// Fold one graded bid into the profile.
    pub fn observe(&mut self, observed: ObservedBid, total_dice: usize) {
        let bluff_target = if observed.was_bluff { 1.0 } else { 0.0 };
        self.bluff_frequency += EMA_ALPHA * (bluff_target - self.bluff_frequency);

        if total_dice > 0 {
            let ratio = (observed.quantity as f64 / total_dice as f64).min(1.0);
            self.aggressiveness += EMA_ALPHA * (ratio - self.aggressiveness);
        }

        if (1..=FACES as u8).contains(&observed.face) {
            self.face_preference[observed.face as usize - 1] += 0.5;
        }

        self.history.push_back(observed);
        while self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }

        self.updates += 1;
        if self.updates % RENORM_INTERVAL == 0 {
            self.renormalize_faces();
        }
    }

    /// Preference weight for a face, relative to 1.0 = indifferent.
    pub fn face_weight(&self, face: u8) -> f64 {
        if (1..=FACES as u8).contains(&face) {
            self.face_preference[face as usize - 1]
        } else {
            1.0
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &ObservedBid> {
        self.history.iter()
    }

    fn renormalize_faces(&mut self) {
        let mean: f64 = self.face_preference.iter().sum::<f64>() / FACES as f64;
        if mean > 0.0 {
            for w in &mut self.face_preference {
                *w /= mean;
            }
        }
    }
}

impl Default for OpponentModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Models for every opponent at the table, keyed by seat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpponentModels {
    models: HashMap<PlayerId, OpponentModel>,
}

impl OpponentModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player: PlayerId) -> Option<&OpponentModel> {
        self.models.get(&player)
    }

    pub fn entry(&mut self, player: PlayerId) -> &mut OpponentModel {
        self.models.entry(player).or_default()
    }

    /// Grade every bid of the ended round against the challenge reveal and
    /// fold each into its bidder's model.
    pub fn update_after_challenge(
        &mut self,
        result: &ChallengeResult,
        previous_bids: &[Bid],
        round_no: u32,
    ) {
        let total_dice: usize = result.reveal.iter().map(|(_, dice)| dice.len()).sum();
        let graded = previous_bids.iter().chain(std::iter::once(&result.bid));
        for bid in graded {
            let actual = tally_reveal(&result.reveal, bid.face);
            self.entry(bid.bidder).observe(
                ObservedBid {
                    round_no,
                    quantity: bid.quantity,
                    face: bid.face,
                    was_bluff: actual < bid.quantity,
                },
                total_dice,
            );
        }
    }
}
