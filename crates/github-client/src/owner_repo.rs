//! Repository locator parsing

use crate::error::GitHubError;
use std::fmt;

const GITHUB_MARKER: &str = "github.com/";

/// `owner/repo` pair extracted from a repository URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerRepo {
    owner: String,
    repo: String,
}

impl OwnerRepo {
    /// Creates a locator from its two parts
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Extracts `owner/repo` from a URL such as `https://github.com/acme/widgets`.
    ///
    /// Everything after the `github.com/` marker is used; a trailing `.git`,
    /// trailing slashes and any deeper path (`/issues`, `/tree/main`) are ignored.
    pub fn from_repo_url(url: &str) -> Result<Self, GitHubError> {
        let start = url
            .find(GITHUB_MARKER)
            .ok_or_else(|| GitHubError::InvalidRepository(format!("{url} is not a github.com URL")))?;
        let rest = &url[start + GITHUB_MARKER.len()..];

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let owner = segments.next();
        let repo = segments.next().map(|r| r.trim_end_matches(".git"));

        match (owner, repo) {
            (Some(owner), Some(repo)) if !repo.is_empty() => Ok(Self::new(owner, repo)),
            _ => Err(GitHubError::InvalidRepository(format!(
                "{url} does not name an owner and a repository"
            ))),
        }
    }

    /// Account or organization owning the repository
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name without the `.git` suffix
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl fmt::Display for OwnerRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
