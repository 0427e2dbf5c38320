//! Controller-specific error types.
//!
//! This module defines error types specific to the GithubIssue Controller
//! that are not covered by upstream library errors.

use github_client::GitHubError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the GithubIssue Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// GitHub transport or decode error
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    /// GitHub answered with an unexpected status code
    #[error("Repo - {owner_repo}, bad HTTP response code - {code}{reason}")]
    RemoteFailure {
        owner_repo: String,
        code: u16,
        /// ", Not Found" style suffix, empty for codes without a known reason
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reconciliation failed
    #[error("Reconciliation failed: {0}")]
    Reconciliation(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}
