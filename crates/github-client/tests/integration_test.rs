//! Integration tests for the GitHub client
//!
//! These tests create and close a real issue.
//! Set GITHUB_TOKEN and GITHUB_TEST_REPO (e.g. "https://github.com/acme/sandbox") to run.

use github_client::{GitHubClient, GitHubClientTrait, IssueReceive, OwnerRepo};
use std::time::Duration;

fn client() -> GitHubClient {
    let url = std::env::var("GITHUB_API_URL")
        .unwrap_or_else(|_| "https://api.github.com".to_string());
    let token = std::env::var("GITHUB_TOKEN")
        .expect("GITHUB_TOKEN environment variable must be set");

    GitHubClient::new(url, token, Duration::from_secs(10)).expect("Failed to create client")
}

fn test_repo() -> OwnerRepo {
    let url = std::env::var("GITHUB_TEST_REPO")
        .expect("GITHUB_TEST_REPO environment variable must be set");
    OwnerRepo::from_repo_url(&url).expect("GITHUB_TEST_REPO is not a GitHub repository URL")
}

#[tokio::test]
#[ignore] // Requires a GitHub token and a sandbox repository
async fn test_create_update_close_issue() {
    let client = client();
    let repo = test_repo();

    let created = client
        .create_issue(&repo, "githubissues-operator test", "created by integration test")
        .await
        .expect("Failed to create issue");
    assert_eq!(created.status, 201, "unexpected create response: {}", created.body);
    let issue: IssueReceive = created.decode().expect("Failed to decode created issue");
    assert!(issue.number > 0);

    let updated = client
        .update_issue(
            &repo,
            issue.number,
            "githubissues-operator test",
            "updated by integration test",
        )
        .await
        .expect("Failed to update issue");
    assert_eq!(updated.status, 200);
    let issue: IssueReceive = updated.decode().expect("Failed to decode updated issue");
    assert_eq!(issue.description(), "updated by integration test");

    let closed = client
        .close(&repo, issue.number)
        .await
        .expect("Failed to close issue");
    assert_eq!(closed.status, 200);
    let issue: IssueReceive = closed.decode().expect("Failed to decode closed issue");
    assert_eq!(issue.state, "closed");
}

#[tokio::test]
#[ignore]
async fn test_create_in_missing_repo_is_not_found() {
    let client = client();
    let repo = OwnerRepo::new("razo7", "this-repository-does-not-exist-4f1c");

    let response = client
        .create_issue(&repo, "should fail", "")
        .await
        .expect("Request should reach GitHub");
    assert_eq!(response.status, 404);
}
