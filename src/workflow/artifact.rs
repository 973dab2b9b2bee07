//! Artifacts from GitHub REST API and related functions.

use std::fmt::Display;

use reqwest::StatusCode;
use serde::Deserialize;
use tokio_util::bytes::Bytes;
use tracing::{debug, error, info};

use super::{PER_PAGE, WorkflowRunRef};
use crate::{
    Result,
    api::{GitHubClient, RepositoryRef, Transport, client::NO_PARAMS},
    framework::State,
};

/// Represents artifacts from GitHub REST API.
#[derive(Debug, Deserialize, Clone)]
pub struct Artifacts {
    pub artifacts: Option<Vec<Artifact>>,
}

/// Represents an artifact from GitHub REST API.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub size_in_bytes: u64,
    pub archive_download_url: String,
    /// Expired artifacts are still listed, but their archive is gone.
    #[serde(default)]
    pub expired: bool,
    pub digest: Option<String>,
    pub workflow_run: Option<WorkflowRunRef>,
}

impl Artifact {
    /// The commit this artifact was built from, if known.
    pub fn head_sha(&self) -> Option<&str> {
        self.workflow_run
            .as_ref()
            .map(|workflow_run| workflow_run.head_sha.as_str())
    }
}

impl Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, {} bytes at {})",
            self.name, self.id, self.size_in_bytes, self.archive_download_url
        )
    }
}

/// Fetches the most recent page of artifacts of a repository.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not an artifact listing.
pub async fn fetch_artifacts<T>(client: &GitHubClient<T>, repo: &RepositoryRef) -> Result<Artifacts>
where
    T: Transport,
{
    let url = format!("{}/actions/artifacts", repo.api_url(client.api_url()));
    debug!("fetching artifacts from {url}…");

    let artifacts: Artifacts = client.get_json(&url, &[("per_page", PER_PAGE)]).await?;
    match &artifacts.artifacts {
        Some(listed) => match listed.len() {
            1 => info!("fetched 1 artifact from {url}"),
            count => info!("fetched {count} artifacts from {url}"),
        },
        None => debug!("no artifacts listed at {url}"),
    }
    Ok(artifacts)
}

/// Downloads the archive of the specified artifact from GitHub.
///
/// Returns [`State::Stop`] if the artifact is gone, and [`State::Retry`] on any other
/// unsuccessful status.
///
/// # Errors
///
/// Returns an error if the request fails, is unauthorized, or exhausts the quota.
pub async fn download_artifact<T>(client: &GitHubClient<T>, artifact: &Artifact) -> Result<State<Bytes>>
where
    T: Transport,
{
    debug!(
        "requesting download from {}…",
        &artifact.archive_download_url
    );

    let response = client.get(&artifact.archive_download_url, NO_PARAMS).await?;
    match response.status {
        status if status.is_success() => {
            info!(
                "downloaded {} byte(s) from {}",
                response.body.len(),
                artifact.archive_download_url
            );
            Ok(State::Success(response.body))
        }
        StatusCode::GONE => {
            error!("failed to request download: artifact expired or removed");
            Ok(State::Stop)
        }
        status => {
            if let Some(reason) = status.canonical_reason() {
                error!(
                    "failed to request download from {}: {} {reason}",
                    &artifact.archive_download_url,
                    status.as_u16()
                );
            } else {
                error!(
                    "failed to request download from {}: {}",
                    &artifact.archive_download_url,
                    status.as_u16()
                )
            }
            Ok(State::Retry)
        }
    }
}
