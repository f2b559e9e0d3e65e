//! Recording state machine
//!
//! Validates commands against the current phase, drives the capture
//! session, and on stop hands the raw buffer to the transcoding engine.
//! Exactly one session occupies the slot at a time; commands issued from
//! the wrong phase are no-ops rather than errors, so rapid duplicate
//! calls observe the post-transition phase and do nothing.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::capture::{CapturePlatform, CaptureSession};
use crate::recorder::error::{RecordingError, RecordingResult};
use crate::recorder::events::{StatusChannel, StatusEvent};
use crate::recorder::state::{RecorderPhase, RecordingSession};
use crate::settings::RecorderSettings;
use crate::transcode::engine::{EncodeRequest, Transcoder};
use crate::transcode::resolution::resolve_preset;
use crate::types::Bounds;

/// A transcode kicked off by `stop`, to be driven to completion by the
/// caller's spawned tasks.
pub struct PendingEncode {
    pub session_id: Uuid,
    pub handle: JoinHandle<RecordingResult<()>>,
    pub progress: mpsc::Receiver<u8>,
}

pub struct RecordingCoordinator {
    platform: Arc<dyn CapturePlatform>,
    transcoder: Arc<dyn Transcoder>,
    status: StatusChannel,
    phase: RecorderPhase,
    session: Option<RecordingSession>,

    /// Set when the capture surface could not be created at all. The
    /// subsystem stays unusable until the host builds a fresh recorder.
    disabled: Option<String>,
}

impl RecordingCoordinator {
    pub fn new(
        platform: Arc<dyn CapturePlatform>,
        transcoder: Arc<dyn Transcoder>,
        status: StatusChannel,
    ) -> Self {
        Self {
            platform,
            transcoder,
            status,
            phase: RecorderPhase::Idle,
            session: None,
            disabled: None,
        }
    }

    pub fn phase(&self) -> RecorderPhase {
        self.phase
    }

    /// Begin a new recording session.
    ///
    /// Returns the new session id plus the capture surface's failure
    /// channel, which the caller monitors for mid-stream errors.
    pub async fn start(
        &mut self,
        bounds: Bounds,
        settings: RecorderSettings,
    ) -> RecordingResult<(Uuid, Option<mpsc::Receiver<String>>)> {
        if let Some(reason) = &self.disabled {
            return Err(RecordingError::Disabled(reason.clone()));
        }
        if self.session.is_some() {
            return Err(RecordingError::AlreadyRecording);
        }
        bounds.validate()?;

        self.phase = RecorderPhase::Starting;

        let sources = match self.platform.sources().await {
            Ok(sources) => sources,
            Err(e) => {
                self.phase = RecorderPhase::Idle;
                self.status.emit(StatusEvent::Error {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };
        let Some(source) = sources
            .iter()
            .find(|s| s.is_primary)
            .or_else(|| sources.first())
        else {
            self.phase = RecorderPhase::Idle;
            let err = RecordingError::NoSourceAvailable;
            self.status.emit(StatusEvent::Error {
                error: err.to_string(),
            });
            return Err(err);
        };

        let surface = match self.platform.create_surface().await {
            Ok(surface) => surface,
            Err(e) => {
                // Surface creation failing at all is fatal to the subsystem
                let reason = e.to_string();
                tracing::error!("Capture surface unavailable, disabling recorder: {}", reason);
                self.disabled = Some(reason.clone());
                self.phase = RecorderPhase::Error;
                self.status.emit(StatusEvent::Error { error: reason });
                return Err(e);
            }
        };

        let (capture, failures) = match CaptureSession::begin(surface, source, bounds).await {
            Ok(ok) => ok,
            Err(e) => {
                self.phase = RecorderPhase::Idle;
                self.status.emit(StatusEvent::Error {
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        let session = RecordingSession::new(bounds, settings, capture);
        let session_id = session.id;
        self.session = Some(session);
        self.phase = RecorderPhase::Recording;
        self.status.emit(StatusEvent::Recording);

        Ok((session_id, failures))
    }

    /// Pause the active recording. No-op unless currently recording.
    pub async fn pause(&mut self) -> RecordingResult<bool> {
        if self.phase != RecorderPhase::Recording {
            return Ok(false);
        }
        let session = self
            .session
            .as_mut()
            .ok_or(RecordingError::CaptureFailure("no active session".into()))?;

        if let Err(e) = session.capture.pause().await {
            self.fail_session(e.to_string()).await;
            return Err(e);
        }

        self.phase = RecorderPhase::Paused;
        self.status.emit(StatusEvent::Paused);
        Ok(true)
    }

    /// Resume a paused recording. No-op unless currently paused.
    pub async fn resume(&mut self) -> RecordingResult<bool> {
        if self.phase != RecorderPhase::Paused {
            return Ok(false);
        }
        let session = self
            .session
            .as_mut()
            .ok_or(RecordingError::CaptureFailure("no active session".into()))?;

        if let Err(e) = session.capture.resume().await {
            self.fail_session(e.to_string()).await;
            return Err(e);
        }

        self.phase = RecorderPhase::Recording;
        self.status.emit(StatusEvent::Recording);
        Ok(true)
    }

    /// Finalize capture and hand the raw buffer to the transcoder.
    ///
    /// Returns `None` when there is nothing to stop. On success the
    /// encode is already running; the caller drives the returned
    /// [`PendingEncode`] and reports back via [`Self::on_encode_progress`]
    /// and [`Self::on_encode_done`].
    pub async fn stop(&mut self) -> RecordingResult<Option<PendingEncode>> {
        if !matches!(
            self.phase,
            RecorderPhase::Recording | RecorderPhase::Paused
        ) {
            return Ok(None);
        }
        self.phase = RecorderPhase::Stopping;

        let session = self
            .session
            .as_mut()
            .ok_or(RecordingError::CaptureFailure("no active session".into()))?;

        let buffer = match session.capture.finalize().await {
            Ok(buffer) => buffer,
            Err(e) => {
                self.fail_session(e.to_string()).await;
                return Err(e);
            }
        };
        session.capture.close().await;

        // Persist the raw buffer next to where the final file will land
        let temp_path = session.temp_file_path();
        let write_result = std::fs::create_dir_all(&session.settings.output_directory)
            .and_then(|_| std::fs::write(&temp_path, &buffer));
        if let Err(e) = write_result {
            let err = RecordingError::Io(e);
            self.fail_session(err.to_string()).await;
            return Err(err);
        }
        session.temp_path = Some(temp_path.clone());

        self.phase = RecorderPhase::Processing;
        self.status
            .emit(StatusEvent::Processing { progress: None });

        let request = EncodeRequest {
            input: temp_path,
            output: session.output_file_path(),
            resolution: resolve_preset(&session.settings.resolution_preset),
            crop: Some(session.bounds),
            include_audio: session.settings.audio_mode.wants_audio(),
        };
        let (progress_tx, progress_rx) = mpsc::channel(16);

        let job = match self.transcoder.encode(request, progress_tx).await {
            Ok(job) => job,
            Err(e) => {
                self.fail_session(e.to_string()).await;
                return Err(e);
            }
        };

        let session = self
            .session
            .as_mut()
            .ok_or(RecordingError::CaptureFailure("no active session".into()))?;
        session.encoder = Some(job.canceller);

        Ok(Some(PendingEncode {
            session_id: session.id,
            handle: job.handle,
            progress: progress_rx,
        }))
    }

    /// Re-emit encoder progress for the given session.
    ///
    /// Ignored once the session has reached a terminal status, so a
    /// straggling progress value can never follow `completed`/`error`.
    pub fn on_encode_progress(&mut self, session_id: Uuid, percent: u8) {
        let current = self.session.as_ref().map(|s| s.id);
        if current == Some(session_id) && self.phase == RecorderPhase::Processing {
            self.status.emit(StatusEvent::Processing {
                progress: Some(percent),
            });
        }
    }

    /// Handle the encoder's terminal result for the given session.
    pub async fn on_encode_done(&mut self, session_id: Uuid, result: RecordingResult<()>) {
        if self.session.as_ref().map(|s| s.id) != Some(session_id) {
            // The session was torn down while the encoder was running
            tracing::debug!("Ignoring encode result for finished session {}", session_id);
            return;
        }
        let mut session = match self.session.take() {
            Some(session) => session,
            None => return,
        };
        session.encoder = None;
        session.cleanup_temp_file();

        match result {
            Ok(()) => {
                let output_path = session.output_file_path();
                tracing::info!("Recording completed: {:?}", output_path);
                self.phase = RecorderPhase::Idle;
                self.status.emit(StatusEvent::Completed { output_path });
            }
            Err(e) => {
                tracing::warn!("Encoding failed: {}", e);
                self.phase = RecorderPhase::Error;
                self.status.emit(StatusEvent::Error {
                    error: e.to_string(),
                });
            }
        }
    }

    /// Force the session into the error state after an asynchronous
    /// capture failure. Ignored when the failing session is no longer
    /// the active one.
    pub async fn force_failure(&mut self, session_id: Uuid, reason: String) {
        if self.session.as_ref().map(|s| s.id) != Some(session_id) {
            return;
        }
        tracing::warn!("Capture failure: {}", reason);
        self.fail_session(format!("Capture error: {}", reason)).await;
    }

    /// Forced teardown: terminate any live encoder, release all session
    /// resources, and return to idle. Safe to call repeatedly.
    pub async fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            tracing::info!("Tearing down active session {}", session.id);
            if let Some(encoder) = session.encoder.take() {
                encoder.cancel();
            }
            session.capture.close().await;
            session.cleanup_temp_file();

            self.status.emit(StatusEvent::Error {
                error: RecordingError::Cancelled.to_string(),
            });
        }

        if self.phase != RecorderPhase::Idle {
            self.phase = RecorderPhase::Idle;
            self.status.emit(StatusEvent::Ready);
        }
    }

    /// Tear down the session and report the failure.
    async fn fail_session(&mut self, reason: String) {
        if let Some(mut session) = self.session.take() {
            if let Some(encoder) = session.encoder.take() {
                encoder.cancel();
            }
            session.capture.close().await;
            session.cleanup_temp_file();
        }
        self.phase = RecorderPhase::Error;
        self.status.emit(StatusEvent::Error { error: reason });
    }
}
