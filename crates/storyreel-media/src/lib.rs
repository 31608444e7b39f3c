#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper and the audio-visual stitching engine.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with progress parsing and
//!   cancellation support
//! - FFprobe-backed duration/geometry probing in milliseconds
//! - Frame quantization: mapping audio durations onto fixed-fps
//!   boundaries without cumulative drift
//! - Segment stitching, ordered concatenation, and background-music
//!   overlay

pub mod background;
pub mod command;
pub mod compose;
pub mod concat;
pub mod error;
pub mod fs_utils;
pub mod probe;
pub mod progress;
pub mod quantize;
pub mod stitch;

pub use background::BackgroundMixer;
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use compose::Compositor;
pub use error::{MediaError, MediaResult};
pub use probe::{duration_ms, probe_media, MediaInfo};
pub use progress::{FfmpegProgress, ProgressCallback};
pub use quantize::{frames_for, frames_for_config, FrameQuantization};
pub use stitch::SegmentStitcher;
