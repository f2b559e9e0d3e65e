//! Capture platform abstractions
//!
//! Low-level pixel capture is a black box behind these traits: the platform
//! enumerates capturable sources and hands out surfaces that stream a
//! region into an encoded raw buffer. Control commands resolve when the
//! surface acknowledges them; mid-stream failures arrive on a separate
//! channel so the state machine can react while no command is in flight.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::recorder::error::RecordingResult;
use crate::types::Bounds;

/// A capturable screen source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    /// Platform-specific source identifier.
    pub id: String,

    /// Human-readable name (e.g. "Main Display").
    pub name: String,

    /// Full source width in pixels.
    pub width: u32,

    /// Full source height in pixels.
    pub height: u32,

    /// Whether this is the primary display.
    pub is_primary: bool,
}

/// Entry point to the platform capture machinery.
///
/// `create_surface` failing is treated as fatal: the recorder reports it
/// once and stays disabled until the host builds a fresh recorder.
#[async_trait]
pub trait CapturePlatform: Send + Sync {
    /// Enumerate capturable screen sources.
    async fn sources(&self) -> RecordingResult<Vec<SourceInfo>>;

    /// Create a hidden capture surface for one recording cycle.
    async fn create_surface(&self) -> RecordingResult<Box<dyn CaptureSurface>>;
}

/// One streaming capture surface.
///
/// Commands are asynchronous: each method resolves once the surface has
/// acknowledged the command, mirroring the event-driven contract of the
/// underlying platform API. The surface gates frame delivery while paused.
#[async_trait]
pub trait CaptureSurface: Send + Sync {
    /// Start streaming the given region of the given source.
    async fn begin(&mut self, source: &SourceInfo, bounds: Bounds) -> RecordingResult<()>;

    /// Suspend frame delivery.
    async fn pause(&mut self) -> RecordingResult<()>;

    /// Resume frame delivery.
    async fn resume(&mut self) -> RecordingResult<()>;

    /// Stop streaming, flush, and return the complete raw media buffer.
    async fn finalize(&mut self) -> RecordingResult<Vec<u8>>;

    /// Channel carrying asynchronous mid-stream failures.
    ///
    /// Yields at most once per cycle; `None` after the first call.
    fn take_failures(&mut self) -> Option<mpsc::Receiver<String>>;

    /// Tear the surface down and release platform resources.
    ///
    /// Must be safe to call after `finalize` or after a failure.
    async fn close(&mut self);
}
