use std::{fmt::Debug, path::Path};

use tracing::{debug, error, info, warn};

use crate::{
    OperationalError, Result,
    api::{GitHubClient, RepositoryRef, Transport},
    env::MAX_DOWNLOAD_ATTEMPTS,
    transactions::download_and_extract_archive,
    workflow::{
        artifact::{Artifact, fetch_artifacts},
        fetch_commits,
        matcher::{ARTIFACT_NAME, most_recent_artifact},
    },
};

/// Downloads the [`ARTIFACT_NAME`] artifact of the most recent commit that has one, and extracts
/// it to a specified path.
///
/// Expired artifacts are skipped. Up to [`MAX_DOWNLOAD_ATTEMPTS`] downloads are made if the
/// archive turns out corrupt.
///
/// See: [`download_and_extract_archive`]
///
/// # Errors
///
/// Returns an [`OperationalError`] if the URL is malformed, the repository has no matching
/// artifacts, or the download keeps failing; or an error if a request fails.
pub async fn install_artifacts<T, P>(client: &GitHubClient<T>, url: &str, path: P) -> Result<()>
where
    T: Transport,
    P: AsRef<Path> + Send + Sync + Debug,
{
    debug!("installing artifacts of {url} to {path:?}…");
    let repo = RepositoryRef::parse(url)?;

    let commits = fetch_commits(client, &repo).await?;

    let Some(artifacts) = fetch_artifacts(client, &repo).await?.artifacts else {
        error!("no artifact found for {url}");
        return Err(OperationalError::NoArtifactsAvailable {
            repository: repo.to_string(),
        }
        .into());
    };

    let artifacts: Vec<Artifact> = artifacts
        .into_iter()
        .filter(|artifact| artifact.name == ARTIFACT_NAME)
        .filter(|artifact| {
            if artifact.expired {
                warn!("skipping expired artifact {artifact}");
            }
            !artifact.expired
        })
        .collect();
    debug!("found {} {ARTIFACT_NAME} artifacts", artifacts.len());

    if artifacts.is_empty() {
        error!("no artifacts for this project");
        return Err(OperationalError::NoMatchingArtifacts {
            repository: repo.to_string(),
            name: ARTIFACT_NAME.to_owned(),
        }
        .into());
    }

    let Some(artifact) = most_recent_artifact(&commits, &artifacts) else {
        error!(
            "none of the {} {ARTIFACT_NAME} artifacts of {repo} belongs to its {} most recent commit(s)",
            artifacts.len(),
            commits.len()
        );
        return Err(OperationalError::NoMatchingArtifactForAnyCommit {
            repository: repo.to_string(),
            commits: commits.len(),
        }
        .into());
    };
    info!("most recent artifact of {repo} is {artifact}");

    download_and_extract_archive(client, artifact, path, *MAX_DOWNLOAD_ATTEMPTS).await
}
