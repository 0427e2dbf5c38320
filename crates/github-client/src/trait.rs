//! GitHubClient trait for mocking
//!
//! This trait abstracts the GitHubClient so the reconciler can be unit tested
//! against `MockGitHubClient` without network access.

use crate::error::GitHubError;
use crate::models::ApiResponse;
use crate::owner_repo::OwnerRepo;

/// Trait for GitHub issue operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
/// Non-2xx responses are returned as `Ok`; only transport failures are `Err`.
#[async_trait::async_trait]
pub trait GitHubClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Creates (`is_create`) or updates issue `issue_number` with title and body.
    /// `issue_number` is ignored on create.
    async fn create_or_update(
        &self,
        owner_repo: &OwnerRepo,
        title: &str,
        description: &str,
        issue_number: u64,
        is_create: bool,
    ) -> Result<ApiResponse, GitHubError>;

    /// Closes issue `issue_number`, stamping the closing time
    async fn close(&self, owner_repo: &OwnerRepo, issue_number: u64) -> Result<ApiResponse, GitHubError>;

    /// Creates an issue; GitHub answers 201 on success
    async fn create_issue(
        &self,
        owner_repo: &OwnerRepo,
        title: &str,
        description: &str,
    ) -> Result<ApiResponse, GitHubError> {
        self.create_or_update(owner_repo, title, description, 0, true).await
    }

    /// Replaces title and body of issue `issue_number`; GitHub answers 200 on success
    async fn update_issue(
        &self,
        owner_repo: &OwnerRepo,
        issue_number: u64,
        title: &str,
        description: &str,
    ) -> Result<ApiResponse, GitHubError> {
        self.create_or_update(owner_repo, title, description, issue_number, false).await
    }
}
