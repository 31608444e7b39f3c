//! Frame quantization: mapping audio durations onto fixed-fps frame
//! boundaries.
//!
//! Each shot's image must stay on screen at least as long as the audio
//! under it, so the frame count is the ceiling of `duration / frame
//! period`. The audio is then padded with silence up to exactly that
//! many frame periods. Because every shot is quantized independently
//! before concatenation, rounding error never accumulates across a
//! segment: the video and audio tracks both derive from the same
//! integer frame counts.

use storyreel_models::RenderConfig;

/// Result of quantizing one audio duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameQuantization {
    /// Number of frames the shot occupies
    pub frame_count: u64,
    /// Audio duration after padding, in milliseconds
    pub padded_duration_ms: u64,
    /// Silence to append, in milliseconds
    pub silence_pad_ms: u64,
}

/// Quantize an audio duration to a frame count and padded duration.
///
/// The frame count is the minimum integer whose total display time
/// covers the audio. A 0 ms clip still gets one frame: a shot with no
/// audible duration would otherwise be invisible, and the image is the
/// point of the shot.
///
/// The padded duration is truncated (not rounded) to whole
/// milliseconds, which makes quantization idempotent: feeding a padded
/// duration back in yields the same frame count and a zero pad.
pub fn frames_for(duration_ms: u64, fps: u32) -> FrameQuantization {
    debug_assert!(fps > 0, "frame rate must be nonzero");
    let fps = u64::from(fps);

    // ceil(duration * fps / 1000), minimum one frame
    let frame_count = (duration_ms * fps).div_ceil(1000).max(1);

    // Truncate toward zero; duration_ms is an integer <= the exact
    // boundary, so padded >= duration always holds.
    let padded_duration_ms = frame_count * 1000 / fps;

    FrameQuantization {
        frame_count,
        padded_duration_ms,
        silence_pad_ms: padded_duration_ms - duration_ms,
    }
}

/// Quantize against a render config's frame rate.
pub fn frames_for_config(duration_ms: u64, config: &RenderConfig) -> FrameQuantization {
    frames_for(duration_ms, config.fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_shot_scenario_at_2fps() {
        // 500 ms per frame
        let first = frames_for(2300, 2);
        assert_eq!(first.frame_count, 5);
        assert_eq!(first.padded_duration_ms, 2500);
        assert_eq!(first.silence_pad_ms, 200);

        let second = frames_for(4100, 2);
        assert_eq!(second.frame_count, 9);
        assert_eq!(second.padded_duration_ms, 4500);
        assert_eq!(second.silence_pad_ms, 400);

        // Combined segment: 14 frames, exactly 7000 ms of audio
        assert_eq!(first.frame_count + second.frame_count, 14);
        assert_eq!(first.padded_duration_ms + second.padded_duration_ms, 7000);
    }

    #[test]
    fn test_exact_boundary_needs_no_padding() {
        let q = frames_for(3000, 2);
        assert_eq!(q.frame_count, 6);
        assert_eq!(q.padded_duration_ms, 3000);
        assert_eq!(q.silence_pad_ms, 0);
    }

    #[test]
    fn test_zero_duration_gets_one_frame() {
        let q = frames_for(0, 2);
        assert_eq!(q.frame_count, 1);
        assert_eq!(q.padded_duration_ms, 500);
        assert_eq!(q.silence_pad_ms, 500);
    }

    #[test]
    fn test_one_millisecond_rounds_up_to_one_frame() {
        let q = frames_for(1, 30);
        assert_eq!(q.frame_count, 1);
        assert_eq!(q.padded_duration_ms, 33);
        assert_eq!(q.silence_pad_ms, 32);
    }

    #[test]
    fn test_monotonic_padding() {
        for fps in [1u32, 2, 3, 24, 30, 60] {
            for duration in [0u64, 1, 99, 333, 500, 667, 1000, 2300, 4100, 86_400_000] {
                let q = frames_for(duration, fps);
                assert!(q.padded_duration_ms >= duration, "fps={fps} dur={duration}");
                assert_eq!(q.silence_pad_ms, q.padded_duration_ms - duration);
            }
        }
    }

    #[test]
    fn test_idempotent_repadding() {
        // Re-quantizing an already padded duration must change nothing,
        // including awkward frame rates where 1000/fps is not integral.
        for fps in [1u32, 2, 3, 7, 24, 30, 60] {
            for duration in [0u64, 1, 250, 333, 667, 1000, 2300, 4100] {
                let q = frames_for(duration, fps);
                let again = frames_for(q.padded_duration_ms, fps);
                assert_eq!(again.frame_count, q.frame_count, "fps={fps} dur={duration}");
                assert_eq!(again.silence_pad_ms, 0, "fps={fps} dur={duration}");
            }
        }
    }

    #[test]
    fn test_frame_audio_parity_within_one_ms() {
        for fps in [2u32, 3, 24, 30] {
            for duration in [1u64, 500, 2300, 4100, 59_999] {
                let q = frames_for(duration, fps);
                let exact_ms = q.frame_count as f64 * 1000.0 / fps as f64;
                assert!(
                    (exact_ms - q.padded_duration_ms as f64).abs() < 1.0,
                    "fps={fps} dur={duration}"
                );
            }
        }
    }

    #[test]
    fn test_frames_for_config_uses_config_fps() {
        let config = RenderConfig::default();
        let q = frames_for_config(2300, &config);
        assert_eq!(q.frame_count, 5);
    }
}
