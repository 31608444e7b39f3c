//! Segment stitching: shots in, one frame-accurate video out.
//!
//! Per shot, in narrative order:
//! 1. probe the voice-over duration
//! 2. quantize it to an integer frame count ([`crate::quantize`])
//! 3. emit exactly that many copies of the still image
//! 4. pad the audio with silence up to the quantized boundary
//!
//! The padded per-shot audio is concatenated into the segment's
//! combined track and muxed against the frame stream. Both tracks
//! derive from the same frame counts, so their durations agree exactly
//! and no drift accumulates across shots.
//!
//! Padding writes a new `<stem>.padded.<ext>` artifact next to the
//! source clip; the collaborator-owned original is never modified.

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use storyreel_models::{PaddedShot, RenderConfig, Segment, Shot};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::concat::{concat_copy_command, write_concat_list};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::{ensure_dir, move_file};
use crate::probe::duration_ms;
use crate::quantize::frames_for_config;

/// Stitches ordered shot sequences into per-segment videos under a
/// common run directory.
pub struct SegmentStitcher {
    root: PathBuf,
    config: RenderConfig,
}

impl SegmentStitcher {
    /// Create a stitcher writing `video_<index>/` directories under `root`.
    pub fn new(root: impl Into<PathBuf>, config: RenderConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// The render geometry shared by every segment in this run.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Stitch one segment from its ordered shots.
    ///
    /// Fatal if the shot list is empty or any artifact is missing; no
    /// partial segment is ever written.
    pub async fn stitch(&self, index: usize, shots: &[Shot]) -> MediaResult<Segment> {
        if shots.is_empty() {
            return Err(MediaError::EmptySegment { index });
        }
        validate_artifacts(shots)?;

        let segment_dir = self.root.join(format!("video_{index}"));
        ensure_dir(&segment_dir).await?;

        info!(
            segment = index,
            shots = shots.len(),
            dir = %segment_dir.display(),
            "stitching segment"
        );

        let tmp = tempfile::tempdir()?;
        let runner = FfmpegRunner::new();

        // Quantize and render every shot.
        let mut padded_shots = Vec::with_capacity(shots.len());
        let mut frame_clips = Vec::with_capacity(shots.len());

        for (i, shot) in shots.iter().enumerate() {
            let source_ms = duration_ms(&shot.audio_path).await?;
            let q = frames_for_config(source_ms, &self.config);

            debug!(
                segment = index,
                shot = %shot.key,
                duration_ms = source_ms,
                frames = q.frame_count,
                pad_ms = q.silence_pad_ms,
                "quantized shot"
            );

            // Frame stream: exactly frame_count copies of the image.
            let clip_path = tmp.path().join(format!("shot_{i}.mp4"));
            let clip_cmd = frame_clip_command(&shot.image_path, &clip_path, &self.config, q.frame_count);
            runner.run(&clip_cmd).await?;
            frame_clips.push(clip_path);

            // Padded audio artifact next to the source clip.
            let padded = padded_audio_path(&shot.audio_path);
            if q.silence_pad_ms == 0 {
                tokio::fs::copy(&shot.audio_path, &padded).await?;
            } else {
                let pad_cmd = pad_command(&shot.audio_path, &padded, q.silence_pad_ms);
                runner.run(&pad_cmd).await?;
            }

            padded_shots.push(PaddedShot {
                shot: shot.clone(),
                frame_count: q.frame_count,
                padded_audio_path: padded,
                padded_duration_ms: q.padded_duration_ms,
            });
        }

        let total_frames: u64 = padded_shots.iter().map(|p| p.frame_count).sum();
        let total_ms: u64 = padded_shots.iter().map(|p| p.padded_duration_ms).sum();

        // Image track: concat the per-shot frame clips.
        let video_tmp = tmp.path().join("video.mp4");
        let video_list = write_concat_list(tmp.path(), "frames.txt", &frame_clips).await?;
        runner.run(&concat_copy_command(&video_list, &video_tmp)).await?;

        // Combined audio track: concat the padded clips, in shot order.
        let audio_tmp = tmp.path().join("audio.mp3");
        let padded_paths: Vec<&Path> = padded_shots
            .iter()
            .map(|p| p.padded_audio_path.as_path())
            .collect();
        let audio_list = write_concat_list(tmp.path(), "audio.txt", &padded_paths).await?;
        runner.run(&concat_copy_command(&audio_list, &audio_tmp)).await?;

        // Mux image track against combined audio.
        let muxed_tmp = tmp.path().join("video_audio.mp4");
        runner.run(&mux_command(&video_tmp, &audio_tmp, &muxed_tmp)).await?;

        // Move finished artifacts into the segment directory.
        let video_path = segment_dir.join("video.mp4");
        let audio_path = segment_dir.join("audio.mp3");
        let muxed_path = segment_dir.join("video_audio.mp4");
        move_file(&video_tmp, &video_path).await?;
        move_file(&audio_tmp, &audio_path).await?;
        move_file(&muxed_tmp, &muxed_path).await?;

        info!(
            segment = index,
            frames = total_frames,
            duration_ms = total_ms,
            video = %muxed_path.display(),
            "segment stitched"
        );

        Ok(Segment {
            index,
            video_path: muxed_path,
            audio_path,
            frame_count: total_frames,
            duration_ms: total_ms,
            shot_count: shots.len(),
            finished_at: Utc::now(),
        })
    }
}

/// Every shot must resolve to one image and one audio artifact.
fn validate_artifacts(shots: &[Shot]) -> MediaResult<()> {
    for shot in shots {
        if !shot.image_path.exists() {
            return Err(MediaError::missing_artifact(&shot.key, &shot.image_path));
        }
        if !shot.audio_path.exists() {
            return Err(MediaError::missing_artifact(&shot.key, &shot.audio_path));
        }
    }
    Ok(())
}

/// Path of the padded copy written next to a source audio clip.
fn padded_audio_path(audio: &Path) -> PathBuf {
    let ext = audio
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "mp3".to_string());
    audio.with_extension(format!("padded.{ext}"))
}

/// Encoder matching a padded clip's container.
fn audio_codec_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("wav") => "pcm_s16le",
        Some("m4a") | Some("aac") => "aac",
        _ => "libmp3lame",
    }
}

/// Build the command rendering `frame_count` copies of a still image.
fn frame_clip_command(
    image: &Path,
    output: &Path,
    config: &RenderConfig,
    frame_count: u64,
) -> FfmpegCommand {
    let scale = format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2",
        w = config.width,
        h = config.height
    );
    let framerate = config.fps.to_string();
    FfmpegCommand::new(output)
        .input_with_args(image, ["-loop", "1", "-framerate", framerate.as_str()])
        .frames(frame_count)
        .video_filter(scale)
        .video_codec("libx264")
        .output_args(["-pix_fmt", "yuv420p"])
}

/// Build the command appending `silence_ms` of silence to a clip.
fn pad_command(src: &Path, dst: &Path, silence_ms: u64) -> FfmpegCommand {
    FfmpegCommand::new(dst)
        .input(src)
        .audio_filter(format!("apad=pad_dur={silence_ms}ms"))
        .audio_codec(audio_codec_for(dst))
}

/// Build the mux command combining the frame stream and combined audio.
fn mux_command(video: &Path, audio: &Path, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input(video)
        .input(audio)
        .map("0:v:0")
        .map("1:a:0")
        .video_codec("copy")
        .audio_codec("aac")
}
