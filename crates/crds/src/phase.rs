//! Internal lifecycle model of a GithubIssue
//!
//! The persisted status stores the remote state and the failed-repo sentinel in
//! the same string field. `IssuePhase` separates the two; conversion to the flat
//! status only happens when the status is written back.

use crate::github_issue::{FAILED_REPO_STATE, GithubIssueStatus};

/// Lifecycle phase derived from `number` and `state`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuePhase {
    /// No remote issue has been created yet
    Uninitialized,

    /// A remote issue exists
    Active {
        /// Remote issue number
        number: u64,
        /// State reported by GitHub ("open" or "closed")
        remote_state: String,
    },

    /// The repository is unusable; create/update are no longer attempted
    Failed {
        /// Remote issue number, 0 if creation never succeeded
        number: u64,
        /// Human-readable failure reason, if one was recorded
        reason: Option<String>,
    },
}

impl IssuePhase {
    /// Remote issue number, 0 when there is none
    pub fn number(&self) -> u64 {
        match self {
            Self::Uninitialized => 0,
            Self::Active { number, .. } | Self::Failed { number, .. } => *number,
        }
    }

    /// Whether this phase absorbs all further create/update attempts
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Flattens the phase into a persisted status
    pub fn to_status(&self, last_update_timestamp: impl Into<String>) -> GithubIssueStatus {
        let last_update_timestamp = last_update_timestamp.into();
        match self {
            Self::Uninitialized => GithubIssueStatus {
                state: String::new(),
                last_update_timestamp,
                number: 0,
                error: None,
            },
            Self::Active { number, remote_state } => GithubIssueStatus {
                state: remote_state.clone(),
                last_update_timestamp,
                number: *number,
                error: None,
            },
            Self::Failed { number, reason } => GithubIssueStatus {
                state: FAILED_REPO_STATE.to_string(),
                last_update_timestamp,
                number: *number,
                error: reason.clone(),
            },
        }
    }
}

impl From<&GithubIssueStatus> for IssuePhase {
    fn from(status: &GithubIssueStatus) -> Self {
        if status.is_failed() {
            Self::Failed {
                number: status.number,
                reason: status.error.clone(),
            }
        } else if status.number == 0 {
            Self::Uninitialized
        } else {
            Self::Active {
                number: status.number,
                remote_state: status.state.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(state: &str, number: u64) -> GithubIssueStatus {
        GithubIssueStatus {
            state: state.to_string(),
            last_update_timestamp: "t0".to_string(),
            number,
            error: None,
        }
    }

    #[test]
    fn test_phase_from_status() {
        assert_eq!(IssuePhase::from(&status("", 0)), IssuePhase::Uninitialized);
        assert_eq!(
            IssuePhase::from(&status("open", 42)),
            IssuePhase::Active { number: 42, remote_state: "open".to_string() }
        );
        // The sentinel wins regardless of the number
        assert_eq!(
            IssuePhase::from(&status(FAILED_REPO_STATE, 7)),
            IssuePhase::Failed { number: 7, reason: None }
        );
        assert!(IssuePhase::from(&status(FAILED_REPO_STATE, 0)).is_failed());
    }

    #[test]
    fn test_failed_phase_flattens_to_sentinel() {
        let phase = IssuePhase::Failed {
            number: 0,
            reason: Some("Not Found".to_string()),
        };
        let flat = phase.to_status("t1");
        assert_eq!(flat.state, FAILED_REPO_STATE);
        assert_eq!(flat.error.as_deref(), Some("Not Found"));
        assert_eq!(IssuePhase::from(&flat), phase);
    }

    #[test]
    fn test_active_phase_clears_error() {
        let flat = IssuePhase::Active { number: 3, remote_state: "closed".to_string() }.to_status("t2");
        assert_eq!(flat.number, 3);
        assert_eq!(flat.state, "closed");
        assert!(flat.error.is_none());
        assert_eq!(flat.last_update_timestamp, "t2");
    }
}
