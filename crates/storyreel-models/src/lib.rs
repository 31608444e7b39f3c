//! Shared data models for the storyreel assembly engine.
//!
//! This crate provides Serde-serializable types for:
//! - Shots (image + voice-over pairs) and their stable keys
//! - Stitched segments and the final composite
//! - Render geometry configuration (fps, resolution)
//! - Segment manifests, the handoff format from the image and speech
//!   collaborators

pub mod manifest;
pub mod render;
pub mod segment;
pub mod shot;

// Re-export common types
pub use manifest::{ManifestError, SegmentManifest, ShotEntry};
pub use render::RenderConfig;
pub use segment::{Composite, Segment};
pub use shot::{PaddedShot, RunId, Shot, ShotKey};
