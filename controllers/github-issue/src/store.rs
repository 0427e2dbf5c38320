//! Custom resource store
//!
//! `IssueStore` abstracts the three API server calls the reconciler needs so it
//! can be unit tested against an in-memory store.

use crate::error::ControllerError;
use crds::{GithubIssue, GithubIssueStatus};
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client};
use tracing::debug;

/// Durable state of GithubIssue resources
#[async_trait::async_trait]
pub trait IssueStore: Send + Sync {
    /// Fetches a resource, `None` if it does not exist
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<GithubIssue>, ControllerError>;

    /// Replaces the whole object (spec and metadata, including finalizers)
    async fn update(&self, issue: &GithubIssue) -> Result<GithubIssue, ControllerError>;

    /// Writes the status sub-resource
    async fn update_status(
        &self,
        namespace: &str,
        name: &str,
        status: &GithubIssueStatus,
    ) -> Result<(), ControllerError>;
}

/// Status patch with every field present, so a merge patch also clears `error`
pub(crate) fn create_status_patch(status: &GithubIssueStatus) -> serde_json::Value {
    serde_json::json!({
        "status": {
            "state": status.state,
            "lastUpdateTimestamp": status.last_update_timestamp,
            "number": status.number,
            "error": status.error,
        }
    })
}

/// Namespace and name of an object about to be written
pub(crate) fn object_ref(issue: &GithubIssue) -> Result<(&str, &str), ControllerError> {
    let name = issue.metadata.name.as_deref()
        .ok_or_else(|| ControllerError::Reconciliation("GithubIssue missing name".to_string()))?;
    let namespace = issue.metadata.namespace.as_deref()
        .unwrap_or("default");
    Ok((namespace, name))
}

/// `IssueStore` backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeIssueStore {
    client: Client,
}

impl KubeIssueStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<GithubIssue> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait::async_trait]
impl IssueStore for KubeIssueStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<GithubIssue>, ControllerError> {
        Ok(self.api(namespace).get_opt(name).await?)
    }

    async fn update(&self, issue: &GithubIssue) -> Result<GithubIssue, ControllerError> {
        let (namespace, name) = object_ref(issue)?;

        debug!("Replacing GithubIssue {}/{}", namespace, name);
        Ok(self.api(namespace).replace(name, &PostParams::default(), issue).await?)
    }

    async fn update_status(
        &self,
        namespace: &str,
        name: &str,
        status: &GithubIssueStatus,
    ) -> Result<(), ControllerError> {
        let status_patch = create_status_patch(status);
        let pp = PatchParams::default();
        self.api(namespace)
            .patch_status(name, &pp, &Patch::Merge(&status_patch))
            .await?;
        debug!("Patched GithubIssue {}/{} status: {:?}", namespace, name, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ref_requires_name() {
        let mut issue = GithubIssue::new("bug", crds::GithubIssueSpec::default());
        assert_eq!(object_ref(&issue).unwrap(), ("default", "bug"));

        issue.metadata.namespace = Some("issues".to_string());
        assert_eq!(object_ref(&issue).unwrap(), ("issues", "bug"));

        issue.metadata.name = None;
        assert!(matches!(object_ref(&issue), Err(ControllerError::Reconciliation(_))));
    }

    #[test]
    fn test_status_patch_clears_error() {
        let patch = create_status_patch(&GithubIssueStatus {
            state: "open".to_string(),
            last_update_timestamp: "t0".to_string(),
            number: 42,
            error: None,
        });
        assert_eq!(
            patch,
            serde_json::json!({
                "status": {
                    "state": "open",
                    "lastUpdateTimestamp": "t0",
                    "number": 42,
                    "error": null,
                }
            })
        );
    }
}
