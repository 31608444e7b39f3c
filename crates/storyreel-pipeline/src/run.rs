//! Sequential run orchestration.
//!
//! Stages run strictly in order: stitch each segment, stitch the outro
//! if configured, concatenate, overlay background music. Each stage
//! consumes the previous stage's files and never re-enters an earlier
//! stage; the first failure aborts the whole run, since a partially
//! assembled composite would silently misrepresent narrative order.

use std::path::PathBuf;
use tracing::info;

use storyreel_media::{BackgroundMixer, Compositor, SegmentStitcher};
use storyreel_models::{Composite, RunId, Segment, SegmentManifest, Shot, ShotKey};

use crate::config::RunConfig;
use crate::error::{PipelineError, PipelineResult};

/// Shot key for the synthesized outro segment.
const OUTRO_KEY: &str = "outro0";

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: RunId,
    pub segments: Vec<Segment>,
    pub composite: Composite,
    /// The final deliverable: composite with background music if
    /// configured, otherwise the composite itself.
    pub final_video: PathBuf,
}

/// Execute a full assembly run.
pub async fn run(config: &RunConfig) -> PipelineResult<RunReport> {
    let run_id = RunId::new();
    info!(%run_id, segments = config.segments.len(), "starting assembly run");

    let stitcher = SegmentStitcher::new(&config.output_dir, config.render);

    // Stitch every configured segment, in order.
    let mut segments = Vec::with_capacity(config.segments.len());
    for (index, entry) in config.segments.iter().enumerate() {
        let shots = load_manifest_shots(&entry.manifest).await?;
        info!(segment = index, manifest = %entry.manifest.display(), shots = shots.len(), "segment loaded");
        let segment = stitcher.stitch(index, &shots).await?;
        segments.push(segment);
    }

    // Outro: one fixed closing shot, stitched like any other segment.
    let outro = match &config.outro {
        Some(outro_config) => {
            let shot = Shot::new(
                ShotKey::from_string(OUTRO_KEY),
                &outro_config.image,
                &outro_config.audio,
            );
            Some(stitcher.stitch(segments.len(), &[shot]).await?)
        }
        None => None,
    };

    // Barrier: every segment video above is fully written before this.
    let compositor = Compositor::new(&config.output_dir);
    let composite = compositor.compile(&segments, outro.as_ref()).await?;

    // Final pass: background music, if configured.
    let final_video = match &config.background {
        Some(background) => {
            let mixer = BackgroundMixer::new(&config.output_dir);
            mixer
                .overlay_background(&composite, &background.track, background.volume_delta_db)
                .await?
        }
        None => composite.composite_path.clone(),
    };

    info!(%run_id, output = %final_video.display(), "assembly run finished");

    Ok(RunReport {
        run_id,
        segments,
        composite,
        final_video,
    })
}

/// Load a segment manifest and resolve its artifacts.
async fn load_manifest_shots(manifest_path: &std::path::Path) -> PipelineResult<Vec<Shot>> {
    let text = tokio::fs::read_to_string(manifest_path).await.map_err(|e| {
        PipelineError::config(format!(
            "cannot read manifest {}: {e}",
            manifest_path.display()
        ))
    })?;
    let manifest = SegmentManifest::from_json(&text)?;
    let base_dir = manifest_path.parent().unwrap_or(std::path::Path::new("."));
    Ok(manifest.resolve(base_dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_manifest_aborts_run() {
        let dir = TempDir::new().unwrap();
        let config: RunConfig = serde_json::from_str(&format!(
            r#"{{"output_dir": "{}", "segments": [{{"manifest": "{}/absent.json"}}]}}"#,
            dir.path().join("video").display(),
            dir.path().display()
        ))
        .unwrap();

        let err = run(&config).await.unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        // Loud failure, no partial output
        assert!(!dir.path().join("video").exists());
    }

    #[tokio::test]
    async fn test_manifest_with_missing_artifacts_aborts_run() {
        let dir = TempDir::new().unwrap();
        let manifest_path = dir.path().join("segment_0.json");
        tokio::fs::write(
            &manifest_path,
            r#"{"shots": [{"key": "title0", "image": "frame_0.png", "audio": "recording_0.mp3"}]}"#,
        )
        .await
        .unwrap();

        let config: RunConfig = serde_json::from_str(&format!(
            r#"{{"output_dir": "{}", "segments": [{{"manifest": "{}"}}]}}"#,
            dir.path().join("video").display(),
            manifest_path.display()
        ))
        .unwrap();

        let err = run(&config).await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Manifest(storyreel_models::ManifestError::MissingArtifact { .. })
        ));
    }

    #[tokio::test]
    async fn test_manifest_shots_resolve_relative_to_manifest_dir() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("frame_0.png"), b"png")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("recording_0.mp3"), b"mp3")
            .await
            .unwrap();

        let manifest_path = dir.path().join("segment_0.json");
        tokio::fs::write(
            &manifest_path,
            r#"{"shots": [{"key": "title0", "image": "frame_0.png", "audio": "recording_0.mp3"}]}"#,
        )
        .await
        .unwrap();

        let shots = load_manifest_shots(&manifest_path).await.unwrap();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].image_path, dir.path().join("frame_0.png"));
    }
}
