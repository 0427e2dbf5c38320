//! Reconciliation logic for GithubIssue resources.
//!
//! - `issue`: the per-pass state machine (finalizer, create, update, close)
//!
//! Per-resource error backoff also lives here; the watcher consults it from
//! its error policy.

pub mod issue;

use crate::backoff::FibonacciBackoff;
use crate::store::IssueStore;
use github_client::GitHubClientTrait;
use kube_runtime::controller::Action;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

/// Delay used when the backoff map cannot be locked
const FALLBACK_BACKOFF: Duration = Duration::from_secs(60);

/// Backoff state for a resource
#[derive(Debug, Clone)]
struct BackoffState {
    backoff: FibonacciBackoff,
    error_count: u32,
}

impl BackoffState {
    fn new() -> Self {
        Self {
            backoff: FibonacciBackoff::new(10, 300), // 10 seconds min, 5 minutes max
            error_count: 0,
        }
    }
}

/// How a reconciliation pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing left to do until the object changes again
    Finished,
    /// Run another pass after the given delay
    RequeueAfter(Duration),
}

impl From<ReconcileOutcome> for Action {
    fn from(outcome: ReconcileOutcome) -> Self {
        match outcome {
            ReconcileOutcome::Finished => Action::await_change(),
            ReconcileOutcome::RequeueAfter(delay) => Action::requeue(delay),
        }
    }
}

/// `namespace/name` key used for logging and backoff tracking
pub(crate) fn resource_key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

/// Reconciles GithubIssue resources.
pub struct Reconciler {
    pub(crate) github_client: Box<dyn GitHubClientTrait + Send + Sync>,
    pub(crate) store: Box<dyn IssueStore>,
    pub(crate) resync_interval: Duration,
    /// Error count tracking per resource (namespace/name -> BackoffState)
    backoff_states: Arc<Mutex<HashMap<String, BackoffState>>>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("github_api", &self.github_client.base_url())
            .field("resync_interval", &self.resync_interval)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(
        github_client: Box<dyn GitHubClientTrait + Send + Sync>,
        store: Box<dyn IssueStore>,
        resync_interval: Duration,
    ) -> Self {
        Self {
            github_client,
            store,
            resync_interval,
            backoff_states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records a failed pass and returns the delay before the next attempt
    pub fn next_error_backoff(&self, resource_key: &str) -> Duration {
        match self.backoff_states.lock() {
            Ok(mut states) => {
                let state = states
                    .entry(resource_key.to_string())
                    .or_insert_with(BackoffState::new);
                state.error_count += 1;
                let delay = state.backoff.next_backoff();
                if state.error_count > 1 {
                    warn!("GithubIssue {} failed {} times in a row", resource_key, state.error_count);
                }
                delay
            }
            Err(e) => {
                warn!("Failed to lock backoff_states: {}, using default backoff", e);
                FALLBACK_BACKOFF
            }
        }
    }

    /// Forget the error history of a resource (on successful reconciliation)
    pub fn reset_error_backoff(&self, resource_key: &str) {
        if let Ok(mut states) = self.backoff_states.lock() {
            states.remove(resource_key);
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_backoffs(&self) -> usize {
        self.backoff_states.lock().map(|states| states.len()).unwrap_or_default()
    }
}
