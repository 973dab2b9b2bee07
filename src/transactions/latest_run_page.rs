use tracing::{debug, info, warn};

use crate::{
    Result,
    api::{GitHubClient, RepositoryRef, Transport},
    workflow::{
        fetch_commits, fetch_workflow_runs,
        matcher::{RUN_NAME, most_recent_run_page},
    },
};

/// Finds the page of the [`RUN_NAME`] workflow run of the most recent commit that has one.
///
/// Returns [`None`] if no such run is among the most recent runs.
///
/// # Errors
///
/// Returns an [`OperationalError`](crate::OperationalError) if the URL is malformed, or an error
/// if a request fails.
pub async fn latest_run_page<T>(client: &GitHubClient<T>, url: &str) -> Result<Option<String>>
where
    T: Transport,
{
    debug!("looking up the latest {RUN_NAME} run of {url}…");
    let repo = RepositoryRef::parse(url)?;

    let commits = fetch_commits(client, &repo).await?;
    let Some(runs) = fetch_workflow_runs(client, &repo).await?.workflow_runs else {
        warn!("no workflow runs found for {url}");
        return Ok(None);
    };

    let page = most_recent_run_page(&commits, &runs).map(str::to_owned);
    match &page {
        Some(page) => info!("latest {RUN_NAME} run of {repo} is at {page}"),
        None => warn!("no {RUN_NAME} run of {repo} belongs to its recent commits"),
    }
    Ok(page)
}
