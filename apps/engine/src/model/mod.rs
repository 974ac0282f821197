//! Per-opponent behavioural models learned from resolved rounds.

pub mod opponent;

pub use opponent::{ObservedBid, OpponentModel, OpponentModels};
