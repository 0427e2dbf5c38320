//! Kubernetes resource watcher.
//!
//! Watches GithubIssue resources and drives reconciliation through
//! `kube_runtime::Controller`, which handles reconnection and serializes passes
//! for the same object.

use crate::error::ControllerError;
use crate::reconciler::{Reconciler, resource_key};
use crds::GithubIssue;
use futures::StreamExt;
use kube::{Api, ResourceExt};
use kube_runtime::{Controller, controller::{Action, Config as ControllerConfig}, watcher};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

fn key_of(issue: &GithubIssue) -> String {
    let namespace = issue.namespace().unwrap_or_else(|| "default".to_string());
    resource_key(&namespace, &issue.name_any())
}

/// Requeues a failed resource with its Fibonacci backoff
fn error_policy(issue: Arc<GithubIssue>, error: &ControllerError, reconciler: Arc<Reconciler>) -> Action {
    let key = key_of(&issue);
    let delay = reconciler.next_error_backoff(&key);
    error!("Reconciliation error for GithubIssue {}: {} (retrying in {:?})", key, error, delay);
    Action::requeue(delay)
}

async fn reconcile(issue: Arc<GithubIssue>, reconciler: Arc<Reconciler>) -> Result<Action, ControllerError> {
    let namespace = issue.namespace().unwrap_or_else(|| "default".to_string());
    let name = issue.name_any();
    debug!("Reconciling GithubIssue {}/{}", namespace, name);

    let outcome = reconciler.reconcile_github_issue(&namespace, &name).await?;
    reconciler.reset_error_backoff(&resource_key(&namespace, &name));
    Ok(outcome.into())
}

/// Watches GithubIssue resources for changes.
pub struct Watcher {
    reconciler: Arc<Reconciler>,
    github_issue_api: Api<GithubIssue>,
    concurrency: u16,
}

impl std::fmt::Debug for Watcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("reconciler", &self.reconciler)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(reconciler: Arc<Reconciler>, github_issue_api: Api<GithubIssue>, concurrency: u16) -> Self {
        Self {
            reconciler,
            github_issue_api,
            concurrency,
        }
    }

    /// Watches GithubIssue resources until a shutdown signal arrives.
    pub async fn watch_github_issues(&self) -> Result<(), ControllerError> {
        info!("Starting GithubIssue watcher (concurrency {})", self.concurrency);

        let controller_config = ControllerConfig::default().concurrency(self.concurrency);

        Controller::new(self.github_issue_api.clone(), watcher::Config::default())
            .with_config(controller_config)
            .shutdown_on_signal()
            .run(reconcile, error_policy, self.reconciler.clone())
            .for_each(|res| async move {
                match res {
                    Ok((obj, _action)) => debug!(
                        "Reconciled GithubIssue {}/{}",
                        obj.namespace.as_deref().unwrap_or("default"),
                        obj.name
                    ),
                    Err(e) => warn!("GithubIssue controller error: {}", e),
                }
            })
            .await;

        info!("GithubIssue watcher stopped");
        Ok(())
    }
}
