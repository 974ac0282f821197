//! Dispatcher that isolates the search on a dedicated compute thread.
//!
//! Game-facing threads must never block on a 5-second search, and a runaway
//! search must never wedge a game. The dispatcher owns one long-lived worker
//! thread fed over an mpsc channel; every request carries its own reply
//! channel and is awaited with a hard timeout of budget + grace, strictly
//! longer than the search's internal deadline so a healthy worker always
//! answers first. One request is in flight at a time per dispatcher.

use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::Decision;
use crate::search::ismcts::{run_search, SearchConfig, SearchContext};

/// Slack on top of the search budget before a request is declared lost.
pub const GRACE_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search config: {0}")]
    InvalidConfig(String),
    #[error("no legal actions to search")]
    NoActions,
    #[error("search worker is gone")]
    WorkerGone,
    #[error("search timed out")]
    Timeout,
    #[error("search payload could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One unit of work for the worker, wire-serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub context: SearchContext,
    pub time_budget_ms: u64,
    pub target_iterations: u32,
}

/// What comes back, wire-serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub decision: Decision,
    pub iterations_completed: u32,
    pub time_spent_ms: u64,
}

struct Envelope {
    request: SearchRequest,
    reply: mpsc::Sender<Result<SearchResponse, SearchError>>,
}

/// Handle to the search worker thread.
pub struct SearchDispatcher {
    sender: mpsc::Sender<Envelope>,
    /// Serializes dispatches: a second caller waits rather than queueing
    /// behind a budget it cannot see.
    in_flight: Mutex<()>,
}

impl SearchDispatcher {
    /// Spawn the worker thread and return its handle. The thread exits when
    /// the dispatcher (and with it the channel) is dropped.
    pub fn spawn() -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<Envelope>();
        thread::Builder::new()
            .name("ismcts-worker".into())
            .spawn(move || {
                while let Ok(envelope) = receiver.recv() {
                    let config = SearchConfig {
                        time_budget_ms: envelope.request.time_budget_ms,
                        target_iterations: envelope.request.target_iterations,
                        ..SearchConfig::default()
                    };
                    let result =
                        run_search(&envelope.request.context, &config).map(|outcome| {
                            SearchResponse {
                                decision: outcome.decision,
                                iterations_completed: outcome.iterations_completed,
                                time_spent_ms: outcome.time_spent_ms,
                            }
                        });
                    // A caller that timed out and went away is fine.
                    let _ = envelope.reply.send(result);
                }
            })?;
        Ok(Self {
            sender,
            in_flight: Mutex::new(()),
        })
    }

    /// Run one request to completion, blocking the calling thread. Returns
    /// `Timeout` if the worker does not answer within budget + grace.
    pub fn dispatch_blocking(
        &self,
        request: SearchRequest,
    ) -> Result<SearchResponse, SearchError> {
        let _guard = self
            .in_flight
            .lock()
            .map_err(|_| SearchError::WorkerGone)?;

        let deadline = Duration::from_millis(request.time_budget_ms + GRACE_MS);
        let (reply_tx, reply_rx) = mpsc::channel();
        self.sender
            .send(Envelope {
                request,
                reply: reply_tx,
            })
            .map_err(|_| SearchError::WorkerGone)?;

        match reply_rx.recv_timeout(deadline) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(timeout_ms = deadline.as_millis() as u64, "search worker timed out");
                Err(SearchError::Timeout)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(SearchError::WorkerGone),
        }
    }
}

/// Async wrapper for callers inside a tokio runtime: the blocking dispatch
/// moves to the blocking pool, with an outer timeout as a second fence.
pub async fn dispatch(
    dispatcher: std::sync::Arc<SearchDispatcher>,
    request: SearchRequest,
) -> Result<SearchResponse, SearchError> {
    let outer = Duration::from_millis(request.time_budget_ms + 2 * GRACE_MS);
    let handle =
        tokio::task::spawn_blocking(move || dispatcher.dispatch_blocking(request));
    match tokio::time::timeout(outer, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => {
            tracing::warn!(error = %join_err, "search dispatch task failed");
            Err(SearchError::WorkerGone)
        }
        Err(_) => Err(SearchError::Timeout),
    }
}
