//! Recording lifecycle
//!
//! [`ScreenRecorder`] is the host-facing boundary: shared handle, async
//! command methods, and a broadcast status channel. The state machine
//! itself lives in [`coordinator::RecordingCoordinator`]; this facade
//! serializes access to it and spawns the background tasks that relay
//! capture failures and encoder progress back into it.

pub mod coordinator;
pub mod error;
pub mod events;
pub mod state;

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use crate::capture::CapturePlatform;
use crate::recorder::coordinator::RecordingCoordinator;
use crate::recorder::error::{RecordingError, RecordingResult};
use crate::recorder::events::{StatusChannel, StatusEvent};
use crate::recorder::state::RecorderPhase;
use crate::settings::RecorderSettings;
use crate::transcode::engine::Transcoder;
use crate::types::Bounds;

/// Host-facing recorder handle.
///
/// Cheap to clone; all clones share the single session slot.
#[derive(Clone)]
pub struct ScreenRecorder {
    inner: Arc<Mutex<RecordingCoordinator>>,
    status: StatusChannel,
}

impl ScreenRecorder {
    pub fn new(platform: Arc<dyn CapturePlatform>, transcoder: Arc<dyn Transcoder>) -> Self {
        let status = StatusChannel::new();
        Self {
            inner: Arc::new(Mutex::new(RecordingCoordinator::new(
                platform,
                transcoder,
                status.clone(),
            ))),
            status,
        }
    }

    /// Subscribe to session status events.
    ///
    /// Events for a session arrive in transition order; progress never
    /// follows the terminal `completed`/`error`.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.status.subscribe()
    }

    pub async fn phase(&self) -> RecorderPhase {
        self.inner.lock().await.phase()
    }

    /// Start a new recording of `bounds` using a snapshot of `settings`.
    ///
    /// Fails with [`RecordingError::AlreadyRecording`] while a session is
    /// active, leaving that session untouched.
    pub async fn start_recording(
        &self,
        bounds: Bounds,
        settings: RecorderSettings,
    ) -> RecordingResult<()> {
        let (session_id, failures) = self.inner.lock().await.start(bounds, settings).await?;

        // Relay asynchronous capture failures into the state machine. The
        // task ends when the surface's failure channel closes at teardown.
        if let Some(mut failures) = failures {
            let inner = self.inner.clone();
            tokio::spawn(async move {
                if let Some(reason) = failures.recv().await {
                    inner.lock().await.force_failure(session_id, reason).await;
                }
            });
        }
        Ok(())
    }

    /// Pause the active recording. Returns `false` when not recording.
    pub async fn pause_recording(&self) -> RecordingResult<bool> {
        self.inner.lock().await.pause().await
    }

    /// Resume a paused recording. Returns `false` when not paused.
    pub async fn resume_recording(&self) -> RecordingResult<bool> {
        self.inner.lock().await.resume().await
    }

    /// Stop capturing and transcode the result in the background.
    ///
    /// Returns `false` when there is nothing to stop. The terminal
    /// `completed`/`error` status arrives on the subscription channel once
    /// the encoder finishes.
    pub async fn stop_recording(&self) -> RecordingResult<bool> {
        let Some(pending) = self.inner.lock().await.stop().await? else {
            return Ok(false);
        };
        let coordinator::PendingEncode {
            session_id,
            handle,
            mut progress,
        } = pending;

        let inner = self.inner.clone();
        tokio::spawn(async move {
            while let Some(percent) = progress.recv().await {
                inner.lock().await.on_encode_progress(session_id, percent);
            }
        });

        let inner = self.inner.clone();
        tokio::spawn(async move {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(RecordingError::EncodingFailed(format!(
                    "encoder task failed: {}",
                    e
                ))),
            };
            inner.lock().await.on_encode_done(session_id, result).await;
        });

        Ok(true)
    }

    /// Forced teardown: kill any live encoder, release session resources,
    /// and return to idle. Safe to call repeatedly, including at host
    /// shutdown.
    pub async fn teardown(&self) {
        self.inner.lock().await.teardown().await;
    }
}
