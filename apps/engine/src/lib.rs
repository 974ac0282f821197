//! Rules and decision engine for a turn-based hidden-information
//! dice-bluffing game (the Dudo / Liar's Dice family) for 2-6 players.
//!
//! The crate is split into:
//! - [`domain`]: the authoritative game-rules state machine (phases, bids,
//!   challenges, effect cards, round lifecycle). Pure and synchronous;
//!   consumed identically for human and AI participants.
//! - [`probability`]: exact Poisson-binomial probabilities over
//!   heterogeneous dice.
//! - [`model`]: per-opponent Bayesian belief state.
//! - [`ai`]: four polymorphic strategy tiers behind a common trait.
//! - [`search`]: the top tier's ISMCTS decision core and its isolated
//!   compute-worker protocol.
//!
//! Transport, session bookkeeping, and persistence are external
//! collaborators; the engine only exposes the boundary contracts in
//! [`domain::commands`], [`domain::events`], and [`search::worker`].

pub mod ai;
pub mod domain;
pub mod error;
pub mod model;
pub mod probability;
pub mod search;

pub use error::EngineError;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nonempty() {
        assert!(!VERSION.is_empty());
    }
}
