//! Shot models: one sentence's still image paired with its voice-over clip.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for one assembly run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for a shot within a segment.
///
/// Keyed by sentence text plus its position in narrative order, so two
/// identical sentences in one segment still resolve to distinct
/// artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShotKey(String);

impl ShotKey {
    /// Build a key from sentence text and its index in the segment.
    pub fn from_text(text: &str, index: usize) -> Self {
        Self(format!("{}{}", text, index))
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ShotKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One still image paired with one voice-over clip.
///
/// Both artifacts are produced by external collaborators before
/// stitching starts; the stitcher only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    /// Stable key, unique within the segment
    pub key: ShotKey,
    /// Still image shown for the whole shot
    pub image_path: PathBuf,
    /// Voice-over clip, owned by the speech collaborator
    pub audio_path: PathBuf,
}

impl Shot {
    pub fn new(
        key: ShotKey,
        image_path: impl Into<PathBuf>,
        audio_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            key,
            image_path: image_path.into(),
            audio_path: audio_path.into(),
        }
    }
}

/// A shot after frame quantization and audio padding.
///
/// The padded audio is a new artifact; the collaborator-owned original
/// is never modified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaddedShot {
    /// The source shot
    pub shot: Shot,
    /// Exact number of video frames this shot occupies
    pub frame_count: u64,
    /// Padded audio artifact, duration exactly `frame_count / fps`
    pub padded_audio_path: PathBuf,
    /// Padded duration in milliseconds
    pub padded_duration_ms: u64,
}
