//! Identifies a repository from its URL.

use std::fmt::Display;

use tracing::error;
use url::Url;

use crate::OperationalError;

/// The owner and name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    /// The user or organization owning the repository.
    pub owner: String,
    /// The repository name, without any `.git` suffix.
    pub name: String,
}

impl RepositoryRef {
    /// Parses a repository URL such as `https://github.com/owner/repo(.git)`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationalError::MalformedRepositoryUrl`] if the URL does not parse, or its path
    /// is not exactly `/owner/repo`.
    pub fn parse(url: &str) -> Result<Self, OperationalError> {
        let malformed = || {
            error!("couldn't split repo from {url}");
            OperationalError::MalformedRepositoryUrl {
                url: url.to_owned(),
            }
        };

        let parsed = Url::parse(url).map_err(|_| malformed())?;
        let segments: Vec<&str> = parsed.path().split('/').collect();
        let &["", owner, repo] = segments.as_slice() else {
            return Err(malformed());
        };
        let name = repo.strip_suffix(".git").unwrap_or(repo);

        if owner.is_empty() || name.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }

    /// The API URL of this repository under `api_url`, e.g. `https://api.github.com/repos/owner/repo`.
    pub fn api_url(&self, api_url: &str) -> String {
        format!("{api_url}/repos/{}/{}", self.owner, self.name)
    }
}

impl Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
