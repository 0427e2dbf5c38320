//! GithubIssue CRD
//!
//! Mirrors a single GitHub issue. The spec is owned by the user, the status is
//! owned by the controller.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Finalizer that blocks deletion until the remote issue has been closed
pub const FINALIZER_NAME: &str = "training.githubissues/finalizer";

/// Sentinel status state for a resource whose repository is unusable
pub const FAILED_REPO_STATE: &str = "Fail repo";

/// Remote state of an open issue
pub const STATE_OPEN: &str = "open";

/// Remote state of a closed issue
pub const STATE_CLOSED: &str = "closed";

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[kube(
    group = "training.githubissues",
    version = "v1alpha1",
    kind = "GithubIssue",
    namespaced,
    status = "GithubIssueStatus",
    shortname = "ghi",
    printcolumn = r#"{"name":"Number","type":"integer","jsonPath":".status.number"}"#,
    printcolumn = r#"{"name":"State","type":"string","jsonPath":".status.state"}"#,
    printcolumn = r#"{"name":"Repo","type":"string","jsonPath":".spec.repo"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct GithubIssueSpec {
    /// Repository URL, e.g. https://github.com/acme/widgets
    pub repo: String,

    /// Issue title
    pub title: String,

    /// Issue description (the GitHub issue body)
    pub description: String,

    /// Issue labels (not reconciled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GithubIssueStatus {
    /// State of the remote issue ("open", "closed") or the failed-repo sentinel
    #[serde(default)]
    pub state: String,

    /// Time of the last status change. Only checked for emptiness.
    #[serde(default)]
    pub last_update_timestamp: String,

    /// Remote issue number, 0 until the issue has been created
    #[serde(default)]
    pub number: u64,

    /// Reason of the last remote failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GithubIssueStatus {
    /// Whether the controller has stamped this status at least once
    pub fn is_initialized(&self) -> bool {
        !self.last_update_timestamp.trim().is_empty()
    }

    /// Whether the status carries the failed-repo sentinel
    pub fn is_failed(&self) -> bool {
        self.state == FAILED_REPO_STATE
    }
}

impl GithubIssue {
    /// Current status, or an empty one if the status sub-resource was never written
    pub fn status_or_default(&self) -> GithubIssueStatus {
        self.status.clone().unwrap_or_default()
    }

    /// Whether the API server has marked this object for deletion
    pub fn is_deleting(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    /// Whether our finalizer is registered on the object
    pub fn has_finalizer(&self) -> bool {
        self.metadata
            .finalizers
            .as_ref()
            .is_some_and(|f| f.iter().any(|name| name == FINALIZER_NAME))
    }

    /// Registers our finalizer. Returns false if it was already present.
    pub fn add_finalizer(&mut self) -> bool {
        if self.has_finalizer() {
            return false;
        }
        self.metadata
            .finalizers
            .get_or_insert_with(Vec::new)
            .push(FINALIZER_NAME.to_string());
        true
    }

    /// Drops our finalizer. Returns false if it was not present.
    pub fn remove_finalizer(&mut self) -> bool {
        if !self.has_finalizer() {
            return false;
        }
        if let Some(finalizers) = self.metadata.finalizers.as_mut() {
            finalizers.retain(|name| name != FINALIZER_NAME);
        }
        true
    }
}
