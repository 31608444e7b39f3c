//! Background music overlay.
//!
//! Loops the background track to the composite's duration, applies a
//! gain offset, and mixes it with the composite's existing audio. The
//! narration track is never attenuated (`amix` with `normalize=0`) and
//! no peak limiting is applied; the default -30 dB gain keeps the mix
//! well under clipping for typical music beds. The video stream is
//! stream-copied, so mixing cannot change the video duration, and the
//! pre-mix composite is retained so the step can be re-run.

use std::path::{Path, PathBuf};
use tracing::info;

use storyreel_models::Composite;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::duration_ms;

/// Overlay filter: mix both audio tracks at the composite's length
/// without rescaling either input.
const AMIX_FILTER: &str = "[0:a][1:a]amix=inputs=2:duration=first:normalize=0[mixed]";

/// Mixes a looped background track under a composite's narration.
pub struct BackgroundMixer {
    root: PathBuf,
}

impl BackgroundMixer {
    /// Create a mixer writing its outputs under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Overlay `track` onto the composite at `volume_delta_db` gain.
    ///
    /// Returns the path of the final video
    /// (`composite_video_bg.mp4`). The looped and gain-adjusted track
    /// is also kept on disk as `background_audio.mp3`.
    pub async fn overlay_background(
        &self,
        composite: &Composite,
        track: &Path,
        volume_delta_db: f64,
    ) -> MediaResult<PathBuf> {
        if !composite.composite_path.exists() {
            return Err(MediaError::precondition(format!(
                "composite not yet compiled: {}",
                composite.composite_path.display()
            )));
        }
        if !track.exists() {
            return Err(MediaError::FileNotFound(track.to_path_buf()));
        }

        // Durations come from the files themselves, not the records.
        let composite_ms = duration_ms(&composite.composite_path).await?;
        let track_ms = duration_ms(track).await?;
        if track_ms == 0 {
            return Err(MediaError::invalid_media(format!(
                "background track has zero duration: {}",
                track.display()
            )));
        }

        let repeats = loop_count(composite_ms, track_ms);
        info!(
            composite_ms,
            track_ms,
            repeats,
            gain_db = volume_delta_db,
            "looping background track"
        );

        let background_path = self.root.join("background_audio.mp3");
        let runner = FfmpegRunner::new();
        runner
            .run(&loop_command(
                track,
                &background_path,
                repeats,
                composite_ms,
                volume_delta_db,
            ))
            .await?;

        let final_path = self.root.join("composite_video_bg.mp4");
        runner
            .run(&mix_command(
                &composite.composite_path,
                &background_path,
                &final_path,
            ))
            .await?;

        info!(output = %final_path.display(), "background music overlaid");
        Ok(final_path)
    }
}

/// Whole-track repetitions needed to cover `composite_ms`.
fn loop_count(composite_ms: u64, track_ms: u64) -> u64 {
    composite_ms.div_ceil(track_ms).max(1)
}

/// Build the command looping, truncating, and gain-adjusting the track.
fn loop_command(
    track: &Path,
    output: &Path,
    repeats: u64,
    composite_ms: u64,
    volume_delta_db: f64,
) -> FfmpegCommand {
    // -stream_loop N plays the input N+1 times
    let extra_loops = (repeats - 1).to_string();
    FfmpegCommand::new(output)
        .input_with_args(track, ["-stream_loop", extra_loops.as_str()])
        .duration_secs(composite_ms as f64 / 1000.0)
        .audio_filter(format!("volume={volume_delta_db}dB"))
        .audio_codec("libmp3lame")
}

/// Build the overlay command mixing both audio tracks.
fn mix_command(composite: &Path, background: &Path, output: &Path) -> FfmpegCommand {
    FfmpegCommand::new(output)
        .input(composite)
        .input(background)
        .filter_complex(AMIX_FILTER)
        .map("0:v")
        .map("[mixed]")
        .video_codec("copy")
        .audio_codec("aac")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_loop_count_scenario() {
        // 10 s track over a 25 s composite: 3 repetitions, then truncate.
        assert_eq!(loop_count(25_000, 10_000), 3);
    }

    #[test]
    fn test_loop_count_edges() {
        // Exact multiple needs no extra repetition
        assert_eq!(loop_count(20_000, 10_000), 2);
        // Track longer than composite plays once and is truncated
        assert_eq!(loop_count(5_000, 10_000), 1);
        // Zero-length composite still gets one pass
        assert_eq!(loop_count(0, 10_000), 1);
    }

    #[test]
    fn test_loop_command_truncates_to_composite_duration() {
        let cmd = loop_command(
            Path::new("bensound-allthat.mp3"),
            Path::new("background_audio.mp3"),
            3,
            25_000,
            -30.0,
        );
        let args = cmd.build_args();

        let loop_pos = args.iter().position(|a| a == "-stream_loop").unwrap();
        assert_eq!(args[loop_pos + 1], "2");
        let i_pos = args.iter().position(|a| a == "-i").unwrap();
        assert!(loop_pos < i_pos, "-stream_loop is an input-side flag");

        let t_pos = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t_pos + 1], "25.000");

        let af_pos = args.iter().position(|a| a == "-af").unwrap();
        assert_eq!(args[af_pos + 1], "volume=-30dB");
    }

    #[test]
    fn test_mix_command_preserves_video_stream() {
        let cmd = mix_command(
            Path::new("composite_video.mp4"),
            Path::new("background_audio.mp3"),
            Path::new("composite_video_bg.mp4"),
        );
        let args = cmd.build_args();

        assert!(args.contains(&AMIX_FILTER.to_string()));
        assert!(args.windows(2).any(|w| w[0] == "-map" && w[1] == "0:v"));
        assert!(args.windows(2).any(|w| w[0] == "-c:v" && w[1] == "copy"));
        // duration=first pins the mix to the composite's length
        assert!(AMIX_FILTER.contains("duration=first"));
        // Narration must not be rescaled down
        assert!(AMIX_FILTER.contains("normalize=0"));
    }

    #[tokio::test]
    async fn test_precondition_composite_must_exist() {
        let dir = TempDir::new().unwrap();
        let track = dir.path().join("music.mp3");
        std::fs::write(&track, b"mp3").unwrap();

        let composite = Composite {
            composite_path: dir.path().join("composite_video.mp4"),
            segment_count: 2,
            duration_ms: 25_000,
        };

        let mixer = BackgroundMixer::new(dir.path());
        let err = mixer
            .overlay_background(&composite, &track, -30.0)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::PreconditionViolation(_)));
    }

    #[tokio::test]
    async fn test_missing_background_track_is_fatal() {
        let dir = TempDir::new().unwrap();
        let composite_path = dir.path().join("composite_video.mp4");
        std::fs::write(&composite_path, b"mp4").unwrap();

        let composite = Composite {
            composite_path,
            segment_count: 1,
            duration_ms: 7000,
        };

        let mixer = BackgroundMixer::new(dir.path());
        let err = mixer
            .overlay_background(&composite, Path::new("/nonexistent/music.mp3"), -30.0)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
