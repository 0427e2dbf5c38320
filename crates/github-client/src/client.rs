//! GitHub API client
//!
//! Implements the issue calls against the GitHub REST API:
//! `POST /repos/{owner}/{repo}/issues` and `PATCH /repos/{owner}/{repo}/issues/{number}`.

use crate::error::GitHubError;
use crate::github_trait::GitHubClientTrait;
use crate::models::{ApiResponse, IssueSend};
use crate::owner_repo::OwnerRepo;
use chrono::Utc;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("githubissues-operator/", env!("CARGO_PKG_VERSION"));

/// GitHub API client
///
/// Holds the credential for its whole lifetime; no global token state.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a new GitHub client
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g., "https://api.github.com")
    /// * `token` - Personal access token used in the Authorization header
    /// * `timeout` - Upper bound for a single request
    pub fn new(base_url: String, token: String, timeout: Duration) -> Result<Self, GitHubError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// URL of the issues collection, or of a single issue when `number` is set
    pub fn issues_url(&self, owner_repo: &OwnerRepo, number: Option<u64>) -> String {
        match number {
            Some(number) => format!(
                "{}/repos/{}/{}/issues/{}",
                self.base_url,
                owner_repo.owner(),
                owner_repo.repo(),
                number
            ),
            None => format!(
                "{}/repos/{}/{}/issues",
                self.base_url,
                owner_repo.owner(),
                owner_repo.repo()
            ),
        }
    }

    async fn send(&self, method: Method, url: &str, payload: &IssueSend) -> Result<ApiResponse, GitHubError> {
        debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("GitHub responded {} for {}", status, url);

        Ok(ApiResponse { status, body })
    }
}

#[async_trait::async_trait]
impl GitHubClientTrait for GitHubClient {
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
        let payload = IssueSend::content(title, description);
        if is_create {
            let url = self.issues_url(owner_repo, None);
            self.send(Method::POST, &url, &payload).await
        } else {
            if issue_number == 0 {
                return Err(GitHubError::InvalidRequest(format!(
                    "cannot update an issue of {owner_repo} without a number"
                )));
            }
            let url = self.issues_url(owner_repo, Some(issue_number));
            self.send(Method::PATCH, &url, &payload).await
        }
    }

    async fn close(&self, owner_repo: &OwnerRepo, issue_number: u64) -> Result<ApiResponse, GitHubError> {
        let url = self.issues_url(owner_repo, Some(issue_number));
        self.send(Method::PATCH, &url, &IssueSend::close(Utc::now())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GitHubClient {
        GitHubClient::new(base_url.to_string(), "t0ken".to_string(), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_issues_url() {
        let client = client("https://api.github.com/");
        let repo = OwnerRepo::new("acme", "widgets");
        assert_eq!(client.issues_url(&repo, None), "https://api.github.com/repos/acme/widgets/issues");
        assert_eq!(
            client.issues_url(&repo, Some(42)),
            "https://api.github.com/repos/acme/widgets/issues/42"
        );
        assert_eq!(client.base_url(), "https://api.github.com");
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let rendered = format!("{:?}", client("https://api.github.com"));
        assert!(!rendered.contains("t0ken"));
    }

    #[tokio::test]
    async fn test_update_without_number_is_rejected() {
        let client = client("https://api.github.com");
        let repo = OwnerRepo::new("acme", "widgets");
        let err = client.update_issue(&repo, 0, "Bug", "Crash").await.unwrap_err();
        assert!(matches!(err, GitHubError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Nothing listens on port 1
        let client = client("http://127.0.0.1:1");
        let repo = OwnerRepo::new("acme", "widgets");
        let err = client.close(&repo, 1).await.unwrap_err();
        assert!(matches!(err, GitHubError::Http(_)));
    }
}
