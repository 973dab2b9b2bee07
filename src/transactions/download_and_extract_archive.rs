use std::{fmt::Debug, path::Path};

use crate::{
    OperationalError, Result,
    api::{GitHubClient, Transport},
    framework::{State, retry_if_possible},
    transactions::{ExtractError, extract_archive},
    workflow::artifact::{Artifact, download_artifact},
};

use sha2::Digest as _;
use tracing::{debug, error, info, warn};

enum Case {
    Extracted,
    Failed(ExtractError),
    HashUnmatch,
}

/// Downloads an [`Artifact`] and extracts the downloaded archive to a specified path.
///
/// A corrupt download (unreadable archive, or a digest mismatch) is downloaded again right away,
/// up to `max_attempts` attempts in total. Only the download is repeated.
///
/// See: [`download_artifact`], [`extract_archive`]
///
/// # Errors
///
/// Returns [`OperationalError::DownloadGaveUp`] once the attempts are used up,
/// [`OperationalError::ArtifactExpired`] if the artifact is gone, or an error if a request fails
/// or the extracted files cannot be written.
pub async fn download_and_extract_archive<T, P>(
    client: &GitHubClient<T>,
    artifact: &Artifact,
    path: P,
    max_attempts: u8,
) -> Result<()>
where
    T: Transport,
    P: AsRef<Path> + Send + Sync + Debug,
{
    let mut attempt: u8 = 1;

    loop {
        debug!(
            "download url {} attempt {attempt}",
            artifact.archive_download_url
        );

        let state = match download_artifact(client, artifact).await? {
            State::Success(archive) => {
                info!("extracting artifact {artifact}…");
                let case = extract(&archive, artifact.digest.as_deref(), &path).await;
                cleanup(artifact, case, &path)?
            }
            other => other.map(|_| ()),
        };

        match state {
            State::Success(()) => return Ok(()),
            State::Retry => {
                if retry_if_possible(&mut attempt, max_attempts).is_err() {
                    error!("gave up downloading archive of {artifact}");
                    return Err(OperationalError::DownloadGaveUp {
                        attempts: max_attempts,
                    }
                    .into());
                }
            }
            State::Stop => {
                return Err(OperationalError::ArtifactExpired {
                    url: artifact.archive_download_url.clone(),
                }
                .into());
            }
        }
    }
}

async fn extract<P>(archive: &[u8], digest: Option<&str>, path: P) -> Case
where
    P: AsRef<Path> + Send + Sync + Debug,
{
    match digest.map(|digest| (digest, digest.strip_prefix("sha256:"))) {
        Some((_, Some(expected))) => {
            if !hex::encode(sha2::Sha256::digest(archive)).eq_ignore_ascii_case(expected) {
                return Case::HashUnmatch;
            }
        }
        Some((digest, None)) => warn!("unsupported digest {digest} for {path:?}, not verifying"),
        None => warn!("digest not provided for {path:?}"),
    }

    match extract_archive(archive, &path).await {
        Ok(()) => Case::Extracted,
        Err(err) => Case::Failed(err),
    }
}

fn cleanup<P>(artifact: &Artifact, case: Case, path: P) -> Result<State<()>>
where
    P: AsRef<Path> + Send + Sync + Debug,
{
    match case {
        Case::Extracted => {
            info!("successfully extracted {artifact} to {path:?}");
            Ok(State::Success(()))
        }
        Case::HashUnmatch => {
            warn!("problem with archive of {artifact}: digest mismatch");
            Ok(State::Retry)
        }
        Case::Failed(ExtractError::Corrupt(err)) => {
            warn!("problem with archive of {artifact}: {err}");
            Ok(State::Retry)
        }
        Case::Failed(ExtractError::Io(err)) => {
            error!("failed to extract {artifact} to {path:?}: {err}");
            Err(err.into())
        }
    }
}
