//! GithubIssue reconciler

use super::{ReconcileOutcome, Reconciler};
use crate::classify::{self, CREATED_CODE, OK_CODE};
use crate::error::ControllerError;
use crds::{GithubIssue, GithubIssueStatus, IssuePhase, STATE_CLOSED};
use github_client::{IssueReceive, OwnerRepo};
use tracing::{debug, error, info, warn};

impl Reconciler {
    /// Runs one reconciliation pass for `namespace/name`.
    pub async fn reconcile_github_issue(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<ReconcileOutcome, ControllerError> {
        let Some(mut issue) = self.store.get(namespace, name).await? else {
            debug!("GithubIssue {}/{} no longer exists", namespace, name);
            return Ok(ReconcileOutcome::Finished);
        };

        info!("Reconciling GithubIssue {}/{}", namespace, name);

        let owner_repo = match OwnerRepo::from_repo_url(&issue.spec.repo) {
            Ok(owner_repo) => owner_repo,
            Err(e) => {
                warn!("GithubIssue {}/{} skipped: {}", namespace, name, e);
                // Nothing was ever created remotely, so nothing blocks deletion
                if issue.is_deleting() && issue.remove_finalizer() {
                    self.store.update(&issue).await?;
                }
                return Ok(ReconcileOutcome::Finished);
            }
        };

        let original_status = issue.status_or_default();
        let mut status = original_status.clone();

        if !status.is_initialized() && !issue.is_deleting() {
            if issue.add_finalizer() {
                // Stored before the create call so every created issue has a finalizer
                debug!("Registering finalizer on GithubIssue {}/{}", namespace, name);
                issue = self.store.update(&issue).await?;
            }
            status.last_update_timestamp = classify::timestamp();
        }

        if issue.is_deleting() {
            if !issue.has_finalizer() {
                return Ok(ReconcileOutcome::Finished);
            }
            return self.finalize_github_issue(issue, status, &owner_repo, namespace, name).await;
        }

        match IssuePhase::from(&status) {
            IssuePhase::Failed { reason, .. } => {
                debug!(
                    "GithubIssue {}/{} is in failed state ({}), not contacting GitHub",
                    namespace, name, reason.as_deref().unwrap_or("no reason recorded")
                );
                if issue.remove_finalizer() {
                    self.store.update(&issue).await?;
                    info!("Released finalizer of failed GithubIssue {}/{}", namespace, name);
                }
            }
            IssuePhase::Uninitialized => {
                status = self.create_remote_issue(&issue, &status, &owner_repo, namespace, name).await?;
            }
            IssuePhase::Active { number, .. } => {
                status = self.update_remote_issue(&issue, &status, number, &owner_repo, namespace, name).await?;
            }
        }

        // Status only; the object itself is never written after a remote call
        if status != original_status {
            self.store.update_status(namespace, name, &status).await?;
        }

        Ok(ReconcileOutcome::RequeueAfter(self.resync_interval))
    }

    async fn create_remote_issue(
        &self,
        issue: &GithubIssue,
        status: &GithubIssueStatus,
        owner_repo: &OwnerRepo,
        namespace: &str,
        name: &str,
    ) -> Result<GithubIssueStatus, ControllerError> {
        let response = self
            .github_client
            .create_issue(owner_repo, &issue.spec.title, &issue.spec.description)
            .await?;

        if let Err(rejected) = classify::classify(status, response.status, CREATED_CODE, owner_repo) {
            error!("Failed to create issue for GithubIssue {}/{}: {}", namespace, name, rejected.error);
            return Ok(rejected.status);
        }

        let remote: IssueReceive = response.decode()?;
        if remote.number == 0 {
            return Err(ControllerError::Reconciliation(format!(
                "GitHub created an issue in {owner_repo} without a number"
            )));
        }

        info!(
            "Created issue #{} in {} for GithubIssue {}/{}",
            remote.number, owner_repo, namespace, name
        );
        let phase = IssuePhase::Active {
            number: remote.number,
            remote_state: remote.state,
        };
        Ok(phase.to_status(classify::timestamp()))
    }

    async fn update_remote_issue(
        &self,
        issue: &GithubIssue,
        status: &GithubIssueStatus,
        number: u64,
        owner_repo: &OwnerRepo,
        namespace: &str,
        name: &str,
    ) -> Result<GithubIssueStatus, ControllerError> {
        let response = self
            .github_client
            .update_issue(owner_repo, number, &issue.spec.title, &issue.spec.description)
            .await?;

        let mut status = match classify::classify(status, response.status, OK_CODE, owner_repo) {
            Ok(status) => status,
            Err(rejected) => {
                error!(
                    "Failed to update issue #{} for GithubIssue {}/{}: {}",
                    number, namespace, name, rejected.error
                );
                return Ok(rejected.status);
            }
        };

        let remote: IssueReceive = response.decode()?;
        if remote.state != status.state {
            info!(
                "Issue #{} in {} is now {} (was {:?})",
                number, owner_repo, remote.state, status.state
            );
            status.state = remote.state.clone();
            status.last_update_timestamp = classify::timestamp();
        }
        if remote.description() != issue.spec.description {
            // Pushed again on the next resync
            warn!(
                "Issue #{} in {} still differs from GithubIssue {}/{} after update",
                number, owner_repo, namespace, name
            );
            status.last_update_timestamp = classify::timestamp();
        }

        Ok(status)
    }

    /// Closes the remote issue and releases the finalizer. The finalizer stays
    /// in place until GitHub confirms the close.
    async fn finalize_github_issue(
        &self,
        mut issue: GithubIssue,
        mut status: GithubIssueStatus,
        owner_repo: &OwnerRepo,
        namespace: &str,
        name: &str,
    ) -> Result<ReconcileOutcome, ControllerError> {
        let number = IssuePhase::from(&status).number();
        if number == 0 {
            info!(
                "GithubIssue {}/{} has no remote issue, releasing finalizer",
                namespace, name
            );
            issue.remove_finalizer();
            self.store.update(&issue).await?;
            return Ok(ReconcileOutcome::Finished);
        }

        let response = self.github_client.close(owner_repo, number).await?;
        match classify::classify(&status, response.status, OK_CODE, owner_repo) {
            Ok(_) => {
                info!(
                    "Closed issue #{} in {} for deleted GithubIssue {}/{}",
                    number, owner_repo, namespace, name
                );
                status.state = STATE_CLOSED.to_string();
                status.last_update_timestamp = classify::timestamp();
                issue.status = Some(status);
                issue.remove_finalizer();
                self.store.update(&issue).await?;
                Ok(ReconcileOutcome::Finished)
            }
            Err(rejected) => {
                error!(
                    "Failed to close issue #{} for GithubIssue {}/{}: {}",
                    number, namespace, name, rejected.error
                );
                self.store.update_status(namespace, name, &rejected.status).await?;
                Err(rejected.error)
            }
        }
    }
}
