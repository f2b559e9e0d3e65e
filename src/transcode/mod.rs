//! Video finishing pipeline
//!
//! Takes the raw captured buffer and produces the final compressed file:
//! preset resolution mapping, crop/scale filter composition, and the
//! external encoder invocation with progress reporting.

pub mod engine;
pub mod filters;
pub mod progress;
pub mod resolution;

pub use engine::{EncodeJob, EncodeRequest, FfmpegTranscoder, Transcoder};
pub use resolution::{resolve_preset, Resolution, DEFAULT_RESOLUTION};
