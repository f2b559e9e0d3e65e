//! Capture session
//!
//! Owns one surface for one start-to-finish recording cycle and forwards
//! control commands to it. Closing the session drops the failure receiver
//! along with the surface, so no listener from a previous cycle can
//! outlive it and fire during the next one.

use tokio::sync::mpsc;

use crate::capture::traits::{CaptureSurface, SourceInfo};
use crate::recorder::error::RecordingResult;
use crate::types::Bounds;

pub struct CaptureSession {
    surface: Box<dyn CaptureSurface>,
    closed: bool,
}

impl CaptureSession {
    /// Begin streaming on the given surface.
    ///
    /// Returns the session plus the surface's failure channel, which the
    /// caller monitors for mid-stream errors. The surface is closed again
    /// if `begin` itself fails.
    pub async fn begin(
        mut surface: Box<dyn CaptureSurface>,
        source: &SourceInfo,
        bounds: Bounds,
    ) -> RecordingResult<(Self, Option<mpsc::Receiver<String>>)> {
        let failures = surface.take_failures();

        if let Err(e) = surface.begin(source, bounds).await {
            surface.close().await;
            return Err(e);
        }

        tracing::info!(
            "Capture started on source '{}' ({} region {})",
            source.id,
            source.name,
            bounds
        );

        Ok((
            Self {
                surface,
                closed: false,
            },
            failures,
        ))
    }

    pub async fn pause(&mut self) -> RecordingResult<()> {
        self.surface.pause().await
    }

    pub async fn resume(&mut self) -> RecordingResult<()> {
        self.surface.resume().await
    }

    /// Stop streaming and collect the finished raw buffer.
    pub async fn finalize(&mut self) -> RecordingResult<Vec<u8>> {
        let buffer = self.surface.finalize().await?;
        tracing::info!("Capture finalized ({} bytes of raw media)", buffer.len());
        Ok(buffer)
    }

    /// Close the underlying surface. Idempotent.
    pub async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.surface.close().await;
            tracing::debug!("Capture surface closed");
        }
    }
}
