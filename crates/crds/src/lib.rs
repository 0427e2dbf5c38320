//! GithubIssue CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the GithubIssue operator.

pub mod github_issue;
pub mod phase;

pub use github_issue::*;
pub use phase::*;
