//! Output directory handling: bootstrap, existence checks, and write-once files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::error::DownloadError;

/// Creates the output directory (and parents) if it does not exist yet.
///
/// # Errors
///
/// Returns [`DownloadError::OutputDir`] when the directory cannot be created
/// or the path exists but is not a directory.
pub async fn ensure_output_dir(path: &Path) -> Result<(), DownloadError> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => {
            debug!(path = %path.display(), "output directory present");
            return Ok(());
        }
        Ok(_) => {
            return Err(DownloadError::output_dir(
                path,
                std::io::Error::new(ErrorKind::AlreadyExists, "path exists and is not a directory"),
            ));
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(DownloadError::output_dir(path, e)),
    }

    fs::create_dir_all(path)
        .await
        .map_err(|e| DownloadError::output_dir(path, e))?;
    info!(path = %path.display(), "created output directory");
    Ok(())
}

/// Finds an existing entry in `dir` whose name equals `filename` ignoring case.
///
/// A missing directory reads as "no match"; other read errors are reported.
///
/// # Errors
///
/// Returns [`DownloadError::OutputDir`] if the directory listing fails.
pub async fn find_existing(dir: &Path, filename: &str) -> Result<Option<PathBuf>, DownloadError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DownloadError::output_dir(dir, e)),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DownloadError::output_dir(dir, e))?
    {
        if entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.eq_ignore_ascii_case(filename))
        {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

/// Writes `bytes` to a file that must not exist yet.
///
/// The file is opened with create-new semantics, so a path that appeared
/// after the existence check surfaces as [`DownloadError::FileCreate`] with
/// [`ErrorKind::AlreadyExists`] instead of being overwritten. A failed write
/// removes the partial file.
///
/// # Errors
///
/// Returns [`DownloadError::FileCreate`] or [`DownloadError::Write`].
pub async fn write_new_file(path: &Path, bytes: &[u8]) -> Result<(), DownloadError> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| DownloadError::file_create(path, e))?;

    let file = write_or_remove(file, path, bytes).await?;
    if let Err(e) = file.sync_all().await {
        drop(file);
        remove_partial(path).await;
        return Err(DownloadError::write(path, e));
    }
    Ok(())
}

/// Writes and flushes `bytes`; on failure closes `writer` and removes `path`.
async fn write_or_remove<W>(mut writer: W, path: &Path, bytes: &[u8]) -> Result<W, DownloadError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;

    match written {
        Ok(()) => Ok(writer),
        Err(e) => {
            drop(writer);
            remove_partial(path).await;
            Err(DownloadError::write(path, e))
        }
    }
}

async fn remove_partial(path: &Path) {
    if let Err(cleanup) = fs::remove_file(path).await {
        warn!(path = %path.display(), error = %cleanup, "failed to remove partial file");
    } else {
        debug!(path = %path.display(), "removed partial file after write error");
    }
}
