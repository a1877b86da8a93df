//! Streams HTTP response bodies into local files.

use crate::storage::error::StorageError;
use futures_util::TryStreamExt;
use log::info;
use std::io;
use std::path::{Component, Path};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

/// Validates a listing-relative path before it is joined under a
/// destination directory. The listing is backend-controlled data, so a
/// path that is absolute, empty, or contains `..` segments is rejected
/// rather than allowed to escape the destination.
pub(crate) fn checked_relative_path(path: &str) -> Result<&Path, StorageError> {
    let relative = Path::new(path);
    let safe = !path.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(relative)
    } else {
        Err(StorageError::UnsafePath(path.to_string()))
    }
}

/// Writes a response body to `dest`, creating parent directories as
/// needed. The body is streamed through a temp file in the destination
/// directory and moved into place once complete, so a failed transfer
/// never leaves a truncated file behind. Returns the number of bytes
/// written.
pub(crate) async fn save_response(
    response: reqwest::Response,
    dest: &Path,
) -> Result<u64, StorageError> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| StorageError::DirCreation(parent.to_path_buf(), e))?;

    let temp = NamedTempFile::new_in(parent)
        .map_err(|e| StorageError::Write(dest.to_path_buf(), e))?;
    let std_file = temp
        .reopen()
        .map_err(|e| StorageError::Write(dest.to_path_buf(), e))?;
    let mut file = tokio::fs::File::from_std(std_file);

    let stream = response.bytes_stream().map_err(io::Error::other);
    let mut reader = StreamReader::new(stream);
    let written = tokio::io::copy(&mut reader, &mut file)
        .await
        .map_err(|e| StorageError::Write(dest.to_path_buf(), e))?;
    file.flush()
        .await
        .map_err(|e| StorageError::Write(dest.to_path_buf(), e))?;

    temp.persist(dest)
        .map_err(|e| StorageError::Persist(dest.to_path_buf(), e))?;
    info!("Saved {} bytes to {:?}", written, dest);
    Ok(written)
}
