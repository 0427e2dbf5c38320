//! GitHub issue API models
//!
//! Only the fields the controller reads or writes are modelled.
//! See: https://docs.github.com/en/rest/issues/issues

use crate::error::GitHubError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Format of the `closed_at` field sent when closing an issue
pub const CLOSED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outbound issue payload for POST and PATCH calls
///
/// Empty fields are omitted so that a PATCH only touches what is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueSend {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub closed_at: String,
}

impl IssueSend {
    /// Payload carrying title and body
    pub fn content(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            ..Default::default()
        }
    }

    /// Payload closing an issue at the given time
    pub fn close(at: DateTime<Utc>) -> Self {
        Self {
            state: "closed".to_string(),
            closed_at: at.format(CLOSED_AT_FORMAT).to_string(),
            ..Default::default()
        }
    }
}

/// Issue as returned by the GitHub API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueReceive {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    /// GitHub returns `null` for an empty body
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub number: u64,
}

impl IssueReceive {
    /// Issue body, empty when GitHub returned none
    pub fn description(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Raw response of an issue call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as received
    pub body: String,
}

impl ApiResponse {
    /// Decodes the response body
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, GitHubError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
