//! Segment manifests: the handoff format from external collaborators.
//!
//! The image renderer and speech synthesizer run before this engine and
//! leave behind one still image and one audio clip per shot key. A
//! manifest is the JSON file that lists those artifacts in narrative
//! order (title first, then sentences) for one segment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::shot::{Shot, ShotKey};

/// One shot's artifact references inside a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotEntry {
    /// Stable key (sentence text + positional index)
    pub key: ShotKey,
    /// Rendered still image
    pub image: PathBuf,
    /// Synthesized voice-over clip
    pub audio: PathBuf,
}

/// Ordered artifact listing for one segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentManifest {
    /// Shots in narrative order
    pub shots: Vec<ShotEntry>,
}

impl SegmentManifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate that every referenced artifact exists on disk and
    /// convert entries into [`Shot`]s, preserving order.
    ///
    /// Relative paths are resolved against `base_dir`, so manifests can
    /// be written with paths relative to their own location.
    pub fn resolve(&self, base_dir: &Path) -> Result<Vec<Shot>, ManifestError> {
        if self.shots.is_empty() {
            return Err(ManifestError::Empty);
        }

        let mut shots = Vec::with_capacity(self.shots.len());
        for entry in &self.shots {
            let image = resolve_path(base_dir, &entry.image);
            let audio = resolve_path(base_dir, &entry.audio);

            if !image.exists() {
                return Err(ManifestError::MissingArtifact {
                    key: entry.key.clone(),
                    path: image,
                });
            }
            if !audio.exists() {
                return Err(ManifestError::MissingArtifact {
                    key: entry.key.clone(),
                    path: audio,
                });
            }

            shots.push(Shot::new(entry.key.clone(), image, audio));
        }
        Ok(shots)
    }
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Manifest loading and validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest lists no shots")]
    Empty,

    #[error("missing artifact for shot {key}: {path}")]
    MissingArtifact { key: ShotKey, path: PathBuf },

    #[error("manifest parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_json() -> &'static str {
        r#"{
            "shots": [
                {"key": "My title0", "image": "frame_0.png", "audio": "recording_0.mp3"},
                {"key": "First sentence.1", "image": "frame_1.png", "audio": "recording_1.mp3"}
            ]
        }"#
    }

    #[test]
    fn test_parse_preserves_order() {
        let manifest = SegmentManifest::from_json(manifest_json()).unwrap();
        assert_eq!(manifest.shots.len(), 2);
        assert_eq!(manifest.shots[0].key.as_str(), "My title0");
        assert_eq!(manifest.shots[1].key.as_str(), "First sentence.1");
    }

    #[test]
    fn test_resolve_rejects_empty() {
        let manifest = SegmentManifest { shots: Vec::new() };
        let err = manifest.resolve(Path::new("/tmp")).unwrap_err();
        assert!(matches!(err, ManifestError::Empty));
    }

    #[test]
    fn test_resolve_rejects_missing_artifact() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("frame_0.png"), b"png").unwrap();
        // recording_0.mp3 deliberately absent

        let manifest = SegmentManifest::from_json(
            r#"{"shots": [{"key": "t0", "image": "frame_0.png", "audio": "recording_0.mp3"}]}"#,
        )
        .unwrap();

        let err = manifest.resolve(dir.path()).unwrap_err();
        match err {
            ManifestError::MissingArtifact { key, path } => {
                assert_eq!(key.as_str(), "t0");
                assert!(path.ends_with("recording_0.mp3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_accepts_complete_artifacts() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("frame_0.png"), b"png").unwrap();
        std::fs::write(dir.path().join("recording_0.mp3"), b"mp3").unwrap();

        let manifest = SegmentManifest::from_json(
            r#"{"shots": [{"key": "t0", "image": "frame_0.png", "audio": "recording_0.mp3"}]}"#,
        )
        .unwrap();

        let shots = manifest.resolve(dir.path()).unwrap();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].key.as_str(), "t0");
        assert!(shots[0].audio_path.starts_with(dir.path()));
    }
}
