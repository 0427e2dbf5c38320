//! Test utilities for unit testing the reconciler
//!
//! This module provides an in-memory `IssueStore` and helpers for creating test data.

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::store::IssueStore;
use crds::{GithubIssue, GithubIssueSpec, GithubIssueStatus};
use github_client::MockGitHubClient;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_NAMESPACE: &str = "default";
pub const TEST_RESYNC: Duration = Duration::from_secs(60);

/// In-memory store that behaves like the API server for the calls the
/// reconciler makes: `update` leaves the status alone, and an object marked for
/// deletion disappears once its last finalizer is gone.
#[derive(Clone, Default)]
pub struct MemoryIssueStore {
    objects: Arc<Mutex<HashMap<(String, String), GithubIssue>>>,
    object_updates: Arc<Mutex<usize>>,
    status_updates: Arc<Mutex<usize>>,
    failing_updates: Arc<Mutex<usize>>,
}

impl MemoryIssueStore {
    pub fn insert(&self, issue: GithubIssue) {
        let key = key_of(&issue);
        self.objects.lock().unwrap().insert(key, issue);
    }

    pub fn fetch(&self, name: &str) -> Option<GithubIssue> {
        self.objects
            .lock()
            .unwrap()
            .get(&(TEST_NAMESPACE.to_string(), name.to_string()))
            .cloned()
    }

    pub fn status(&self, name: &str) -> GithubIssueStatus {
        self.fetch(name).map(|i| i.status_or_default()).unwrap_or_default()
    }

    /// The next `count` object updates fail with a conflict
    pub fn fail_next_updates(&self, count: usize) {
        *self.failing_updates.lock().unwrap() = count;
    }

    pub fn object_updates(&self) -> usize {
        *self.object_updates.lock().unwrap()
    }

    pub fn status_updates(&self) -> usize {
        *self.status_updates.lock().unwrap()
    }

    /// Edits the spec in place, like `kubectl edit`
    pub fn edit_spec(&self, name: &str, edit: impl FnOnce(&mut GithubIssueSpec)) {
        let mut objects = self.objects.lock().unwrap();
        let issue = objects
            .get_mut(&(TEST_NAMESPACE.to_string(), name.to_string()))
            .unwrap();
        edit(&mut issue.spec);
    }

    /// Sets the deletion timestamp, like `kubectl delete` on an object with finalizers
    pub fn mark_deleted(&self, name: &str) {
        let mut objects = self.objects.lock().unwrap();
        let issue = objects
            .get_mut(&(TEST_NAMESPACE.to_string(), name.to_string()))
            .unwrap();
        issue.metadata.deletion_timestamp = deletion_metadata().deletion_timestamp;
    }
}

fn key_of(issue: &GithubIssue) -> (String, String) {
    (
        issue.metadata.namespace.clone().unwrap_or_else(|| TEST_NAMESPACE.to_string()),
        issue.metadata.name.clone().unwrap_or_default(),
    )
}

#[async_trait::async_trait]
impl IssueStore for MemoryIssueStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<GithubIssue>, ControllerError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }

    async fn update(&self, issue: &GithubIssue) -> Result<GithubIssue, ControllerError> {
        {
            let mut failing = self.failing_updates.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(ControllerError::Reconciliation(
                    "409 Conflict: object has been modified".to_string(),
                ));
            }
        }
        *self.object_updates.lock().unwrap() += 1;

        let key = key_of(issue);
        let mut objects = self.objects.lock().unwrap();
        let mut stored = issue.clone();
        stored.status = objects.get(&key).and_then(|existing| existing.status.clone());

        let released = stored.metadata.finalizers.as_ref().is_none_or(Vec::is_empty);
        if stored.is_deleting() && released {
            objects.remove(&key);
        } else {
            objects.insert(key, stored.clone());
        }
        Ok(stored)
    }

    async fn update_status(
        &self,
        namespace: &str,
        name: &str,
        status: &GithubIssueStatus,
    ) -> Result<(), ControllerError> {
        *self.status_updates.lock().unwrap() += 1;

        let mut objects = self.objects.lock().unwrap();
        let issue = objects
            .get_mut(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| ControllerError::Reconciliation(format!("{namespace}/{name} not found")))?;
        issue.status = Some(status.clone());
        Ok(())
    }
}

/// Helper to create a test GithubIssue without status
pub fn create_test_github_issue(name: &str, repo: &str, title: &str, description: &str) -> GithubIssue {
    GithubIssue {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(TEST_NAMESPACE.to_string()),
            ..Default::default()
        },
        spec: GithubIssueSpec {
            repo: repo.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            labels: None,
        },
        status: None,
    }
}

/// Metadata carrying only a deletion timestamp
pub fn deletion_metadata() -> ObjectMeta {
    serde_json::from_value(serde_json::json!({
        "deletionTimestamp": "2024-01-01T00:00:00Z",
    }))
    .unwrap()
}

/// Helper to create a reconciler wired to a mock GitHub and an in-memory store
pub fn create_test_reconciler() -> (Reconciler, MockGitHubClient, MemoryIssueStore) {
    let github = MockGitHubClient::new("http://test-github");
    let store = MemoryIssueStore::default();
    let reconciler = Reconciler::new(Box::new(github.clone()), Box::new(store.clone()), TEST_RESYNC);
    (reconciler, github, store)
}
