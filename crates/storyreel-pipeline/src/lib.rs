//! Run orchestration for the storyreel assembly engine.
//!
//! External collaborators (content fetch, sentence tokenization, image
//! rendering, speech synthesis) run first and leave artifact manifests
//! behind; this crate drives the stitching engine over them: segments
//! in order, optional outro, concatenation, background music.

pub mod config;
pub mod error;
pub mod run;

pub use config::{BackgroundConfig, OutroConfig, RunConfig, SegmentConfig};
pub use error::{PipelineError, PipelineResult};
pub use run::{run, RunReport};
