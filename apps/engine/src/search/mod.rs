//! Time-budgeted ISMCTS decision search and its worker-side plumbing.
//!
//! The search itself (`ismcts`) is synchronous and CPU-bound; `worker` keeps
//! it off latency-sensitive threads behind a dedicated dispatcher with a hard
//! timeout.

pub mod ismcts;
pub mod worker;

pub use ismcts::{run_search, SearchConfig, SearchContext, SearchOutcome};
pub use worker::{SearchDispatcher, SearchError, SearchRequest, SearchResponse};
