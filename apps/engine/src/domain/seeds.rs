//! RNG seed derivation for deterministic game behavior.
//!
//! Derives unique-but-deterministic seeds for different contexts from a
//! base game seed, so the same game replays identically.

/// Seed for rolling a round's dice. Unique per (game, round).
pub fn derive_roll_seed(game_seed: u64, round_no: u32) -> u64 {
    game_seed
        .wrapping_add((round_no as u64).wrapping_mul(1_000_000))
        .wrapping_add(1)
}

/// Seed for one AI decision's search/determinization stream.
/// Unique per (game, round, seat, decision ordinal).
pub fn derive_search_seed(game_seed: u64, round_no: u32, seat: u8, decision_no: u32) -> u64 {
    game_seed
        .wrapping_add((round_no as u64).wrapping_mul(10_000))
        .wrapping_add((seat as u64).wrapping_mul(100))
        .wrapping_add((decision_no as u64).wrapping_mul(7))
        .wrapping_add(2)
}
