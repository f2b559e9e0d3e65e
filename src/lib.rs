//! Regioncast - record a screen region, finish it as a shareable MP4.
//!
//! This crate implements the recording lifecycle and the video finishing
//! pipeline: the state machine governing start/pause/resume/stop, the
//! capture-session handoff, and the crop/scale transcode that turns the
//! raw captured buffer into the final file. Window chrome, region
//! selection, and settings UI belong to the host application; they talk
//! to this crate through [`ScreenRecorder`] and its status channel.

pub mod capture;
pub mod recorder;
pub mod settings;
pub mod transcode;
pub mod types;

pub use capture::{CapturePlatform, CaptureSession, CaptureSurface, SourceInfo};
pub use recorder::error::{RecordingError, RecordingResult};
pub use recorder::events::StatusEvent;
pub use recorder::state::RecorderPhase;
pub use recorder::ScreenRecorder;
pub use settings::{AudioMode, RecorderSettings};
pub use transcode::{FfmpegTranscoder, Resolution, Transcoder};
pub use types::Bounds;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for hosts that have no subscriber of their
/// own. Respects `RUST_LOG` when set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regioncast=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
