//! Render geometry configuration.

use serde::{Deserialize, Serialize};

/// Default frame rate for assembled videos
pub const DEFAULT_FPS: u32 = 2;
/// Default frame width in pixels
pub const DEFAULT_WIDTH: u32 = 1920;
/// Default frame height in pixels
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Frame rate and resolution, fixed for a whole run.
///
/// Every segment in a run shares one `RenderConfig`: the compositor
/// concatenates with stream copy and requires uniform frame geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Frames per second
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Frame width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Frame height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}
fn default_width() -> u32 {
    DEFAULT_WIDTH
}
fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl RenderConfig {
    /// Create a config, rejecting zero fps or zero-sized frames.
    pub fn new(fps: u32, width: u32, height: u32) -> Result<Self, InvalidRenderConfig> {
        if fps == 0 {
            return Err(InvalidRenderConfig::ZeroFps);
        }
        if width == 0 || height == 0 {
            return Err(InvalidRenderConfig::ZeroDimension { width, height });
        }
        Ok(Self { fps, width, height })
    }
}

/// Rejected render configuration values.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InvalidRenderConfig {
    #[error("frame rate must be nonzero")]
    ZeroFps,

    #[error("frame dimensions must be nonzero (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
}
