//! Mock GitHubClient for unit testing
//!
//! This module provides a mock implementation of GitHubClientTrait that can be used
//! in unit tests without reaching api.github.com.
//!
//! By default the mock behaves like a small in-memory GitHub: creates allocate
//! issue numbers, updates echo the stored issue, closes flip the state. Scripted
//! replies queued with `push_reply` take precedence over that behaviour.

use crate::error::GitHubError;
use crate::github_trait::GitHubClientTrait;
use crate::models::{ApiResponse, IssueReceive};
use crate::owner_repo::OwnerRepo;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Issue operation, used to address scripted replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `create_or_update` with `is_create`
    Create,
    /// `create_or_update` on an existing issue
    Update,
    /// `close`
    Close,
}

/// Scripted outcome of a single call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Answer with this status and body
    Respond { status: u16, body: String },
    /// Fail as if the connection could not be established
    TransportError(String),
}

impl MockReply {
    /// Reply with a JSON body
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::Respond {
            status,
            body: body.to_string(),
        }
    }
}

/// A call received by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// Issue creation with the requested title and body
    Create {
        owner_repo: String,
        title: String,
        description: String,
    },
    /// Title and body pushed to issue `number`
    Update {
        owner_repo: String,
        number: u64,
        title: String,
        description: String,
    },
    /// Issue `number` closed
    Close {
        owner_repo: String,
        number: u64,
    },
}

/// Mock GitHubClient for testing
#[derive(Clone)]
pub struct MockGitHubClient {
    base_url: String,
    // In-memory issues keyed by (owner/repo, number)
    issues: Arc<Mutex<HashMap<(String, u64), IssueReceive>>>,
    missing_repos: Arc<Mutex<HashSet<String>>>,
    replies: Arc<Mutex<HashMap<Operation, VecDeque<MockReply>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    // Counter for generating issue numbers
    next_number: Arc<Mutex<u64>>,
}

impl std::fmt::Debug for MockGitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGitHubClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl MockGitHubClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            issues: Arc::new(Mutex::new(HashMap::new())),
            missing_repos: Arc::new(Mutex::new(HashSet::new())),
            replies: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_number: Arc::new(Mutex::new(1)),
        }
    }

    /// Number the next created issue will get
    pub fn set_next_number(&self, number: u64) {
        *self.next_number.lock().unwrap() = number;
    }

    /// Every call for this repository answers 404 (for test setup)
    pub fn add_missing_repo(&self, owner_repo: &str) {
        self.missing_repos.lock().unwrap().insert(owner_repo.to_string());
    }

    /// Add an existing issue to the mock store (for test setup)
    pub fn add_issue(&self, owner_repo: &str, issue: IssueReceive) {
        self.issues
            .lock()
            .unwrap()
            .insert((owner_repo.to_string(), issue.number), issue);
    }

    /// Get a stored issue
    pub fn issue(&self, owner_repo: &str, number: u64) -> Option<IssueReceive> {
        self.issues
            .lock()
            .unwrap()
            .get(&(owner_repo.to_string(), number))
            .cloned()
    }

    /// Queue a scripted reply for the next call of `operation`
    pub fn push_reply(&self, operation: Operation, reply: MockReply) {
        self.replies
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(reply);
    }

    /// All calls received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls of the given operation received so far
    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| {
                matches!(
                    (operation, call),
                    (Operation::Create, MockCall::Create { .. })
                        | (Operation::Update, MockCall::Update { .. })
                        | (Operation::Close, MockCall::Close { .. })
                )
            })
            .count()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn scripted(&self, operation: Operation) -> Option<Result<ApiResponse, GitHubError>> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)?;
        Some(match reply {
            MockReply::Respond { status, body } => Ok(ApiResponse { status, body }),
            MockReply::TransportError(msg) => Err(GitHubError::InvalidRequest(msg)),
        })
    }

    fn not_found(&self, owner_repo: &str) -> Option<ApiResponse> {
        self.missing_repos
            .lock()
            .unwrap()
            .contains(owner_repo)
            .then(|| ApiResponse {
                status: 404,
                body: serde_json::json!({ "message": "Not Found" }).to_string(),
            })
    }

    fn respond(status: u16, issue: &IssueReceive) -> Result<ApiResponse, GitHubError> {
        Ok(ApiResponse {
            status,
            body: serde_json::to_string(issue)?,
        })
    }
}

#[async_trait::async_trait]
impl GitHubClientTrait for MockGitHubClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn create_or_update(
        &self,
        owner_repo: &OwnerRepo,
        title: &str,
        description: &str,
        issue_number: u64,
        is_create: bool,
    ) -> Result<ApiResponse, GitHubError> {
        let key = owner_repo.to_string();

        if is_create {
            self.record(MockCall::Create {
                owner_repo: key.clone(),
                title: title.to_string(),
                description: description.to_string(),
            });
            if let Some(reply) = self.scripted(Operation::Create) {
                return reply;
            }
            if let Some(response) = self.not_found(&key) {
                return Ok(response);
            }

            let number = {
                let mut next = self.next_number.lock().unwrap();
                let current = *next;
                *next += 1;
                current
            };
            let issue = IssueReceive {
                url: format!("{}/repos/{}/issues/{}", self.base_url, key, number),
                title: title.to_string(),
                body: Some(description.to_string()),
                state: "open".to_string(),
                number,
            };
            self.issues.lock().unwrap().insert((key, number), issue.clone());
            return Self::respond(201, &issue);
        }

        self.record(MockCall::Update {
            owner_repo: key.clone(),
            number: issue_number,
            title: title.to_string(),
            description: description.to_string(),
        });
        if let Some(reply) = self.scripted(Operation::Update) {
            return reply;
        }
        if let Some(response) = self.not_found(&key) {
            return Ok(response);
        }

        let mut issues = self.issues.lock().unwrap();
        match issues.get_mut(&(key, issue_number)) {
            Some(issue) => {
                issue.title = title.to_string();
                issue.body = Some(description.to_string());
                Self::respond(200, issue)
            }
            None => Ok(ApiResponse {
                status: 404,
                body: serde_json::json!({ "message": "Not Found" }).to_string(),
            }),
        }
    }

    async fn close(&self, owner_repo: &OwnerRepo, issue_number: u64) -> Result<ApiResponse, GitHubError> {
        let key = owner_repo.to_string();
        self.record(MockCall::Close {
            owner_repo: key.clone(),
            number: issue_number,
        });
        if let Some(reply) = self.scripted(Operation::Close) {
            return reply;
        }
        if let Some(response) = self.not_found(&key) {
            return Ok(response);
        }

        let mut issues = self.issues.lock().unwrap();
        match issues.get_mut(&(key, issue_number)) {
            Some(issue) => {
                issue.state = "closed".to_string();
                Self::respond(200, issue)
            }
            None => Ok(ApiResponse {
                status: 404,
                body: serde_json::json!({ "message": "Not Found" }).to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_issue_lifecycle() {
        let mock = MockGitHubClient::new("http://test-github");
        mock.set_next_number(42);
        let repo = OwnerRepo::new("acme", "widgets");

        let created = mock.create_issue(&repo, "Bug", "Crash on start").await.unwrap();
        assert_eq!(created.status, 201);
        assert_eq!(created.decode::<IssueReceive>().unwrap().number, 42);

        let updated = mock.update_issue(&repo, 42, "Bug", "Crash on startup").await.unwrap();
        assert_eq!(updated.status, 200);
        assert_eq!(mock.issue("acme/widgets", 42).unwrap().description(), "Crash on startup");

        let closed = mock.close(&repo, 42).await.unwrap();
        assert_eq!(closed.status, 200);
        assert_eq!(mock.issue("acme/widgets", 42).unwrap().state, "closed");

        assert_eq!(mock.call_count(Operation::Create), 1);
        assert_eq!(mock.call_count(Operation::Update), 1);
        assert_eq!(mock.call_count(Operation::Close), 1);
    }

    #[tokio::test]
    async fn test_scripted_reply_takes_precedence() {
        let mock = MockGitHubClient::new("http://test-github");
        let repo = OwnerRepo::new("acme", "widgets");
        mock.push_reply(Operation::Create, MockReply::TransportError("connection refused".to_string()));

        assert!(mock.create_issue(&repo, "Bug", "").await.is_err());
        // Queue drained, back to default behaviour
        assert_eq!(mock.create_issue(&repo, "Bug", "").await.unwrap().status, 201);
    }

    #[tokio::test]
    async fn test_missing_repo_answers_not_found() {
        let mock = MockGitHubClient::new("http://test-github");
        mock.add_missing_repo("acme/gone");
        let repo = OwnerRepo::new("acme", "gone");

        assert_eq!(mock.create_issue(&repo, "Bug", "").await.unwrap().status, 404);
        assert_eq!(mock.close(&repo, 1).await.unwrap().status, 404);
    }
}
