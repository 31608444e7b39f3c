//! Composite assembly: concatenating segment videos in order.
//!
//! Concatenation is a strict barrier: every segment video must already
//! be fully written. Order is authoritative; a missing or unreadable
//! segment aborts the whole composite rather than being skipped, since
//! a silently dropped segment would desynchronize narrative order.

use std::path::{Path, PathBuf};
use tracing::info;

use storyreel_models::{Composite, Segment};

use crate::command::FfmpegRunner;
use crate::concat::{concat_copy_command, write_concat_list};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::ensure_dir;

/// Concatenates stitched segments into one composite video.
pub struct Compositor {
    root: PathBuf,
}

impl Compositor {
    /// Create a compositor writing `composite_video.mp4` under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Concatenate all segment videos, in input order, with an optional
    /// outro segment appended last.
    ///
    /// Segments travel with their own audio; no re-encoding and no
    /// transitions, just sequential stream-copy concatenation. All
    /// segments must share one frame geometry.
    pub async fn compile(
        &self,
        segments: &[Segment],
        outro: Option<&Segment>,
    ) -> MediaResult<Composite> {
        let mut ordered: Vec<&Segment> = segments.iter().collect();
        if let Some(outro) = outro {
            ordered.push(outro);
        }

        if ordered.is_empty() {
            return Err(MediaError::NoSegments);
        }

        for segment in &ordered {
            if segment.shot_count == 0 || segment.frame_count == 0 {
                return Err(MediaError::EmptySegment {
                    index: segment.index,
                });
            }
            if !segment.video_path.exists() {
                return Err(MediaError::FileNotFound(segment.video_path.clone()));
            }
        }

        ensure_dir(&self.root).await?;
        let composite_path = self.root.join("composite_video.mp4");

        info!(
            segments = ordered.len(),
            output = %composite_path.display(),
            "concatenating segments"
        );

        // The list file is scratch, not an artifact; keep it out of the
        // run output directory.
        let tmp = tempfile::tempdir()?;
        let videos: Vec<&Path> = ordered.iter().map(|s| s.video_path.as_path()).collect();
        let list = write_concat_list(tmp.path(), "segments.txt", &videos).await?;
        FfmpegRunner::new()
            .run(&concat_copy_command(&list, &composite_path))
            .await?;

        let duration_ms = ordered.iter().map(|s| s.duration_ms).sum();

        info!(
            duration_ms,
            output = %composite_path.display(),
            "composite written"
        );

        Ok(Composite {
            composite_path,
            segment_count: ordered.len(),
            duration_ms,
        })
    }
}
