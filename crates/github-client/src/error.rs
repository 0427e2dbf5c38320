//! GitHub client errors

use thiserror::Error;

/// Errors that can occur when talking to the GitHub API
///
/// Unexpected HTTP status codes are not errors at this level; they are
/// returned in `ApiResponse` and classified by the caller.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport failure (DNS, connection refused, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request could not be built or sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Repository URL does not point at a GitHub repository
    #[error("Invalid repository: {0}")]
    InvalidRepository(String),
}
