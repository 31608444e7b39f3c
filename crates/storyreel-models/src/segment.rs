//! Stitched segment and composite output records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One content item rendered as shots and stitched into a single video.
///
/// Finalized once its video is written; never re-opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Position in the composite, 0-based
    pub index: usize,
    /// Muxed video+audio file, input to the compositor
    pub video_path: PathBuf,
    /// Combined padded per-shot audio
    pub audio_path: PathBuf,
    /// Total frames across all shots
    pub frame_count: u64,
    /// Total duration in milliseconds (equals `frame_count / fps`)
    pub duration_ms: u64,
    /// Number of shots stitched into this segment
    pub shot_count: usize,
    /// When the segment video finished writing
    pub finished_at: DateTime<Utc>,
}

/// The concatenated output: all segments in order, optionally followed
/// by an outro segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Composite {
    /// Concatenated video file
    pub composite_path: PathBuf,
    /// Number of segments concatenated (outro included)
    pub segment_count: usize,
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_roundtrip() {
        let segment = Segment {
            index: 2,
            video_path: PathBuf::from("/tmp/video/video_2/video_audio.mp4"),
            audio_path: PathBuf::from("/tmp/video/video_2/audio.mp3"),
            frame_count: 14,
            duration_ms: 7000,
            shot_count: 2,
            finished_at: Utc::now(),
        };

        let json = serde_json::to_string(&segment).unwrap();
        let parsed: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.index, 2);
        assert_eq!(parsed.frame_count, 14);
        assert_eq!(parsed.duration_ms, 7000);
    }
}
