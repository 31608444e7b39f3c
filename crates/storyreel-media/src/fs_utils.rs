//! Filesystem utilities for run-directory bootstrap and artifact moves.

use std::path::Path;
use tokio::fs;

use crate::error::{MediaError, MediaResult};

/// Create a directory (and parents) if it does not exist.
pub async fn ensure_dir(dir: impl AsRef<Path>) -> MediaResult<()> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir).await?;
    }
    Ok(())
}

/// Move a finished artifact from `src` to `dst`.
///
/// Stitching happens in a temp directory which may live on a different
/// filesystem than the run's output directory, so a plain rename can
/// fail with EXDEV. In that case fall back to copy-then-delete, copying
/// to a temp name first so the destination appears atomically.
pub async fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> MediaResult<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        ensure_dir(parent).await?;
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            tracing::debug!(
                "cross-device rename, falling back to copy+delete: {} -> {}",
                src.display(),
                dst.display()
            );
            copy_and_delete(src, dst).await
        }
        Err(e) => Err(MediaError::from(e)),
    }
}

/// Check if an IO error is EXDEV (cross-device link).
fn is_cross_device_error(e: &std::io::Error) -> bool {
    // EXDEV is error code 18 on Linux/macOS
    e.raw_os_error() == Some(18)
}

async fn copy_and_delete(src: &Path, dst: &Path) -> MediaResult<()> {
    let tmp_dst = dst.with_extension("tmp");

    fs::copy(src, &tmp_dst).await?;

    if let Err(e) = fs::rename(&tmp_dst, dst).await {
        let _ = std::fs::remove_file(&tmp_dst);
        return Err(MediaError::from(e));
    }

    // Best effort; the artifact is already in place.
    if let Err(e) = fs::remove_file(src).await {
        tracing::warn!("failed to remove source after move: {}: {}", src.display(), e);
    }

    Ok(())
}
