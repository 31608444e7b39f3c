//! Error types for media operations.

use std::path::PathBuf;
use storyreel_models::ShotKey;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during stitching, concatenation, and mixing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("missing artifact for shot {key}: {path}")]
    MissingArtifact { key: ShotKey, path: PathBuf },

    #[error("segment {index} has no shots")]
    EmptySegment { index: usize },

    #[error("no segments to concatenate")]
    NoSegments,

    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("invalid media file: {0}")]
    InvalidMedia(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a missing-artifact error for a shot.
    pub fn missing_artifact(key: &ShotKey, path: impl Into<PathBuf>) -> Self {
        Self::MissingArtifact {
            key: key.clone(),
            path: path.into(),
        }
    }

    /// Create a precondition violation error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionViolation(message.into())
    }

    /// Create an invalid-media error.
    pub fn invalid_media(message: impl Into<String>) -> Self {
        Self::InvalidMedia(message.into())
    }
}
