//! Errors surfaced by the library.
//!
//! Nothing in this crate terminates the process. [`OperationalError`]s are the conditions an
//! operator has to act on; the binary maps them to a non-zero exit code.

use std::{io, path::PathBuf};

/// Unrecoverable, operator-facing conditions.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum OperationalError {
    /// The repository URL does not point at exactly `owner/repo`.
    #[error("couldn't split owner and repository from {url}")]
    MalformedRepositoryUrl {
        /// The URL as given.
        url: String,
    },

    /// The API rejected the credentials, or none were supplied for a protected resource.
    #[error(
        "unauthorized, set GH_TOKEN or GITHUB_TOKEN (or GH_USERNAME and GH_PASSWORD) to a GitHub API token"
    )]
    Unauthorized,

    /// No API requests are left until the quota resets.
    #[error("X-RateLimit no API requests remaining, resets in {seconds_to_reset}s")]
    QuotaExhausted {
        /// Seconds until the quota is replenished.
        seconds_to_reset: i64,
    },

    /// The artifacts listing carried no artifacts collection at all.
    #[error("no artifact found for {repository}")]
    NoArtifactsAvailable {
        /// The repository, as `owner/name`.
        repository: String,
    },

    /// None of the listed artifacts has the expected name.
    #[error("no {name} artifacts for {repository}")]
    NoMatchingArtifacts {
        /// The repository, as `owner/name`.
        repository: String,
        /// The artifact name looked for.
        name: String,
    },

    /// Artifacts exist, but none belongs to a commit in the fetched history.
    #[error("no artifact of {repository} matches any of its {commits} most recent commit(s)")]
    NoMatchingArtifactForAnyCommit {
        /// The repository, as `owner/name`.
        repository: String,
        /// How many commits were searched.
        commits: usize,
    },

    /// The artifact is gone from the server.
    #[error("artifact expired or removed: {url}")]
    ArtifactExpired {
        /// The archive download URL.
        url: String,
    },

    /// Every download attempt produced an unusable archive.
    #[error("gave up downloading archive after {attempts} attempt(s)")]
    DownloadGaveUp {
        /// The number of attempts made.
        attempts: u8,
    },
}

/// Any error of this crate.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// See [`OperationalError`].
    #[error(transparent)]
    Operational(#[from] OperationalError),

    /// A single-file download found nothing at its URL.
    #[error("couldn't download {url} to {}", path.display())]
    NotFound {
        /// The URL requested.
        url: String,
        /// The destination the file would have been written to.
        path: PathBuf,
    },

    /// The request could not be sent or its response could not be read.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The response body is not the expected JSON.
    #[error("unexpected response body: {0}")]
    Json(#[from] serde_json::Error),

    /// File content from the contents API is not valid base64.
    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A local filesystem operation failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether this error is one of the [`OperationalError`]s.
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Operational(_))
    }
}

/// A shorthand for results carrying this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
