//! HTTP result classification
//!
//! A GitHub call whose status code differs from the one expected for the
//! operation flips the resource into the failed-repo sentinel state. This is the
//! only place where that decision is made.

use crate::error::ControllerError;
use chrono::Utc;
use crds::{FAILED_REPO_STATE, GithubIssueStatus};
use github_client::OwnerRepo;

/// Expected status code of a create call
pub const CREATED_CODE: u16 = 201;

/// Expected status code of update and close calls
pub const OK_CODE: u16 = 200;

/// A call that did not return the expected code
#[derive(Debug)]
pub struct Rejected {
    /// Status stamped with the failed-repo sentinel
    pub status: GithubIssueStatus,
    /// Error describing the repository and the offending code
    pub error: ControllerError,
}

/// Timestamp written to `lastUpdateTimestamp`
pub fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

fn reason_suffix(code: u16) -> &'static str {
    match code {
        404 => ", Not Found",
        403 => ", Forbidden",
        401 => ", Unauthorized Client",
        _ => "",
    }
}

/// Compares `http_code` against `expected_code`.
///
/// Returns the status unchanged when they match. Otherwise returns a copy set to
/// the failed-repo sentinel with a fresh timestamp and the error message.
pub fn classify(
    status: &GithubIssueStatus,
    http_code: u16,
    expected_code: u16,
    owner_repo: &OwnerRepo,
) -> Result<GithubIssueStatus, Rejected> {
    if http_code == expected_code {
        return Ok(status.clone());
    }

    let error = ControllerError::RemoteFailure {
        owner_repo: owner_repo.to_string(),
        code: http_code,
        reason: reason_suffix(http_code).to_string(),
    };
    let status = GithubIssueStatus {
        state: FAILED_REPO_STATE.to_string(),
        last_update_timestamp: timestamp(),
        number: status.number,
        error: Some(error.to_string()),
    };

    Err(Rejected { status, error })
}
