//! Single-file retrieval: through the contents API, or straight from a URL.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{
    client::{GitHubClient, NO_PARAMS},
    repository::RepositoryRef,
    transport::{Request, Transport},
};
use crate::{Error, Result};

/// Fetches the content of the file at `path` in the default branch of `repo`.
///
/// Returns [`None`] if the response has no `content`, i.e. the file does not exist or `path` is a
/// directory. Base64 content is decoded; any other encoding is returned verbatim.
///
/// # Errors
///
/// Returns an error if the request fails, is unauthorized, exhausts the quota, or the body is not
/// JSON or not valid base64.
pub async fn fetch_file_content<T>(
    client: &GitHubClient<T>,
    repo: &RepositoryRef,
    path: &str,
) -> Result<Option<Vec<u8>>>
where
    T: Transport,
{
    let url = format!(
        "{}/contents/{}",
        repo.api_url(client.api_url()),
        path.trim_start_matches('/')
    );
    debug!("fetching content from {url}…");

    let data: Value = client.get_json(&url, NO_PARAMS).await?;
    let Some(content) = data.get("content").and_then(Value::as_str) else {
        debug!("no content at {url}");
        return Ok(None);
    };

    match data.get("encoding").and_then(Value::as_str) {
        Some("base64") => {
            // GitHub wraps the encoded content into lines
            let content: String = content.split_whitespace().collect();
            let decoded = STANDARD.decode(content)?;
            info!("fetched {} byte(s) from {url}", decoded.len());
            Ok(Some(decoded))
        }
        _ => Ok(Some(content.as_bytes().to_vec())),
    }
}

/// Downloads `url` with a plain, unauthenticated `GET` and writes the body to `path`.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the response is anything but `200 OK`, or an error if the
/// request or the write fails.
pub async fn fetch_file<T, P>(transport: &T, url: &str, path: P) -> Result<()>
where
    T: Transport,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    info!("trying to download {url}");

    let response = transport.request(Request::get(url)).await?;
    if response.status != StatusCode::OK {
        warn!("couldn't download {url}: {}", response.status);
        return Err(Error::NotFound {
            url: url.to_owned(),
            path: path.to_path_buf(),
        });
    }

    tokio::fs::write(path, &response.body).await?;
    info!("written to {}", path.display());
    Ok(())
}
