use async_zip::{base::read::seek::ZipFileReader, error::ZipError};
use futures::io::Cursor;

use std::{
    io,
    path::{Path, PathBuf},
};

/// An error while extracting an archive.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The archive is malformed, truncated, or an entry fails its CRC-32 check.
    #[error("bad archive: {0}")]
    Corrupt(#[from] ZipError),
    /// Writing the extracted files failed.
    #[error("failed to write extracted files: {0}")]
    Io(#[from] io::Error),
}

/// Extracts a zip archive held in memory to a specified path.
/// This function will sanitize the file path and create intermediate directories if possible.
///
/// Every entry is checked against the CRC-32 recorded in the central directory before it is
/// written. Files already present at the path are overwritten. An archive found corrupt midway
/// leaves the entries before the corruption extracted.
///
/// # Errors
///
/// Returns [`ExtractError::Corrupt`] if the archive cannot be read, or [`ExtractError::Io`] if the
/// files cannot be written.
pub async fn extract_archive<P>(archive: &[u8], path: P) -> Result<(), ExtractError>
where
    P: AsRef<Path> + Send + Sync,
{
    let path = path.as_ref();
    tokio::fs::create_dir_all(path).await?;
    let mut zip = ZipFileReader::new(Cursor::new(archive)).await?;

    for index in 0..zip.file().entries().len() {
        let mut reader = zip.reader_with_entry(index).await?;

        let Ok(name) = reader.entry().filename().as_str() else {
            continue;
        };
        let name = name.to_owned();
        let relative = sanitize_file_path(&name);
        if relative.as_os_str().is_empty() {
            continue;
        }
        let p = path.join(relative);

        if name.ends_with('/') {
            // Is a directory
            if !p.exists() {
                tokio::fs::create_dir_all(&p).await?;
            }
            continue;
        }

        let mut contents = Vec::new();
        reader.read_to_end_checked(&mut contents).await?;

        // Creates parent directories. They may not exist if iteration is out of order or the archive does not contain directory entries
        if let Some(parent) = p.parent() {
            if !parent.is_dir() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&p, contents).await?;
    }

    Ok(())
}

fn sanitize_file_path(path: &str) -> PathBuf {
    // Replaces backwards slashes
    path.replace('\\', "/")
        // Sanitizes each component
        .split('/')
        .map(sanitize_filename::sanitize)
        .filter(|component| !component.is_empty())
        .collect()
}
