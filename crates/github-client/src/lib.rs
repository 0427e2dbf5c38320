//! GitHub Issues REST API Client
//!
//! A small client for the three issue operations the GithubIssue controller
//! needs: create, update and close. Responses are returned raw (status code and
//! body) so the caller decides which status codes count as success.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use github_client::{GitHubClient, GitHubClientTrait, IssueReceive, OwnerRepo};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GitHubClient::new(
//!     "https://api.github.com".to_string(),
//!     "your-api-token".to_string(),
//!     Duration::from_secs(10),
//! )?;
//!
//! let repo = OwnerRepo::from_repo_url("https://github.com/acme/widgets")?;
//! let response = client.create_issue(&repo, "Bug", "Crash on start").await?;
//! if response.status == 201 {
//!     let issue: IssueReceive = response.decode()?;
//!     println!("created issue #{}", issue.number);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod owner_repo;
#[path = "trait.rs"]
pub mod github_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use models::*;
pub use owner_repo::OwnerRepo;
pub use github_trait::GitHubClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockCall, MockGitHubClient, MockReply, Operation};
