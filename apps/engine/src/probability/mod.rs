//! Exact probability support for hidden dice.
//!
//! Hidden dice are independent but not identically distributed (kinds differ),
//! so face counts follow a Poisson binomial distribution. `pbd` holds the pure
//! convolution math; `engine` layers the game-facing queries and a bounded
//! PMF cache on top.

pub mod engine;
pub mod pbd;

pub use engine::ProbabilityEngine;
pub use pbd::{at_least, exactly, pbd_pmf};
