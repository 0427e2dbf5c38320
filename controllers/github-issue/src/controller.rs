//! Main controller implementation.
//!
//! Wires the Kubernetes client, the GitHub client, the reconciler and the
//! watcher together from a loaded `Config`.

use crate::config::Config;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::store::KubeIssueStore;
use crate::watcher::Watcher;
use crds::GithubIssue;
use github_client::GitHubClient;
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for GithubIssue resources.
#[derive(Debug)]
pub struct Controller {
    github_issue_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance and starts its watcher.
    pub async fn new(config: Config) -> Result<Self, ControllerError> {
        info!("Initializing GithubIssue Controller");

        let kube_client = Client::try_default().await?;

        let github_client = GitHubClient::new(
            config.github_api_url.clone(),
            config.github_token.clone(),
            config.http_timeout,
        )?;

        let github_issue_api: Api<GithubIssue> = match config.namespace.as_deref() {
            Some(ns) => Api::namespaced(kube_client.clone(), ns),
            None => Api::all(kube_client.clone()),
        };

        let reconciler = Arc::new(Reconciler::new(
            Box::new(github_client),
            Box::new(KubeIssueStore::new(kube_client)),
            config.resync_interval,
        ));

        let watcher_instance = Arc::new(Watcher::new(reconciler, github_issue_api, config.concurrency));

        let github_issue_watcher = {
            let watcher = watcher_instance.clone();
            tokio::spawn(async move { watcher.watch_github_issues().await })
        };

        Ok(Self { github_issue_watcher })
    }

    /// Runs until the watcher exits.
    pub async fn run(self) -> Result<(), ControllerError> {
        info!("GithubIssue Controller running");

        self.github_issue_watcher
            .await
            .map_err(|e| ControllerError::Watch(format!("GithubIssue watcher panicked: {}", e)))?
            .map_err(|e| ControllerError::Watch(format!("GithubIssue watcher error: {}", e)))?;

        info!("GithubIssue Controller stopped");
        Ok(())
    }
}
