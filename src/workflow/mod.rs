//! Data models of commits and GitHub Actions workflows, and how they are matched.

use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    Result,
    api::{
        GitHubClient, RepositoryRef, Transport,
        client::NO_PARAMS,
    },
};

pub mod artifact;
pub mod matcher;

/// The number of entries requested from paginated listings.
pub const PER_PAGE: u8 = 100;

/// Represents a commit from GitHub REST API.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Commit {
    pub sha: String,
}

/// Represents the workflow run an artifact was produced by, as embedded in the artifact.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct WorkflowRunRef {
    pub head_sha: String,
}

/// Represents workflow runs from GitHub REST API.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowRuns {
    pub workflow_runs: Option<Vec<WorkflowRun>>,
}

/// Represents a GitHub Actions workflow run from GitHub REST API.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub id: u64,
    /// Workflow runs may be unnamed.
    pub name: Option<String>,
    pub head_sha: String,
    pub html_url: String,
}

/// Fetches the most recent page of the commit history, newest first.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a list of commits.
pub async fn fetch_commits<T>(client: &GitHubClient<T>, repo: &RepositoryRef) -> Result<Vec<Commit>>
where
    T: Transport,
{
    let url = format!("{}/commits", repo.api_url(client.api_url()));
    debug!("fetching commits from {url}…");

    let commits: Vec<Commit> = client.get_json(&url, NO_PARAMS).await?;
    info!("fetched {} commit(s) from {url}", commits.len());
    Ok(commits)
}

/// Fetches the most recent page of workflow runs.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a workflow run listing.
pub async fn fetch_workflow_runs<T>(
    client: &GitHubClient<T>,
    repo: &RepositoryRef,
) -> Result<WorkflowRuns>
where
    T: Transport,
{
    let url = format!("{}/actions/runs", repo.api_url(client.api_url()));
    debug!("fetching workflow runs from {url}…");

    let runs: WorkflowRuns = client.get_json(&url, &[("per_page", PER_PAGE)]).await?;
    match &runs.workflow_runs {
        Some(listed) => info!("fetched {} workflow run(s) from {url}", listed.len()),
        None => debug!("no workflow runs listed at {url}"),
    }
    Ok(runs)
}
