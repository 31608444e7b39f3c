//! Run configuration.
//!
//! A run is described by a JSON file: the ordered segment manifests,
//! an optional outro, an optional background track, the render
//! geometry, and the output directory. The collaborators that produce
//! manifests (content fetch, image rendering, speech synthesis) run
//! before this binary and are configured elsewhere.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use storyreel_models::RenderConfig;

use crate::error::{PipelineError, PipelineResult};

/// Default gain applied to the background track, in decibels.
pub const DEFAULT_VOLUME_DELTA_DB: f64 = -30.0;

/// One segment's entry in the run config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Path to the segment's artifact manifest
    pub manifest: PathBuf,
}

/// Outro artifacts: one fixed closing shot appended after all segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutroConfig {
    /// Fixed outro background image
    pub image: PathBuf,
    /// Synthesized closing-line audio
    pub audio: PathBuf,
}

/// Background music settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    /// Music track to loop under the composite
    pub track: PathBuf,
    /// Additive gain in decibels
    #[serde(default = "default_volume_delta")]
    pub volume_delta_db: f64,
}

fn default_volume_delta() -> f64 {
    DEFAULT_VOLUME_DELTA_DB
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("_tmp/video")
}

/// Full run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Frame rate and resolution, shared by every segment
    #[serde(default)]
    pub render: RenderConfig,

    /// Directory receiving all run outputs
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Segments in narrative order
    pub segments: Vec<SegmentConfig>,

    /// Optional outro appended after the last segment
    #[serde(default)]
    pub outro: Option<OutroConfig>,

    /// Optional background music pass
    #[serde(default)]
    pub background: Option<BackgroundConfig>,
}

impl RunConfig {
    /// Load and validate a run config from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            PipelineError::config(format!("cannot read config {}: {e}", path.display()))
        })?;
        let mut config: RunConfig = serde_json::from_str(&text)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides in place.
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("STORYREEL_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
    }

    fn validate(&self) -> PipelineResult<()> {
        // Serde happily accepts explicit zeros; reject them here so a
        // bad config fails loudly instead of reaching frame math.
        RenderConfig::new(self.render.fps, self.render.width, self.render.height)
            .map_err(|e| PipelineError::config(e.to_string()))?;
        if self.segments.is_empty() {
            return Err(PipelineError::config("run config lists no segments"));
        }
        Ok(())
    }
}
