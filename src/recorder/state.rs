//! Recording session state
//!
//! One [`RecordingSession`] exists per start-to-stop cycle. It exclusively
//! owns the capture session, the temporary raw-buffer file, and the
//! encoder handle; all three are released on every exit path.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::capture::CaptureSession;
use crate::settings::RecorderSettings;
use crate::transcode::engine::EncodeCancel;
use crate::types::Bounds;

/// Where the recorder currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderPhase {
    Idle,
    Starting,
    Recording,
    Paused,
    Stopping,
    Processing,
    Error,
}

/// Sortable file-name token for a session start time.
///
/// Millisecond precision keeps rapid back-to-back sessions from
/// colliding on disk.
pub fn timestamp_token(started_at: &DateTime<Local>) -> String {
    started_at.format("%Y-%m-%d_%H-%M-%S-%3f").to_string()
}

/// State owned by one active recording cycle.
pub struct RecordingSession {
    /// Identity guard: late async callbacks carry this id and are ignored
    /// once a different session occupies the slot.
    pub id: Uuid,

    pub bounds: Bounds,
    pub settings: RecorderSettings,
    pub started_at: DateTime<Local>,

    /// The live capture surface wrapper.
    pub capture: CaptureSession,

    /// Temporary raw-buffer file, set once capture finalizes.
    pub temp_path: Option<PathBuf>,

    /// Kill handle for the encoder, set while an encode runs.
    pub encoder: Option<Arc<dyn EncodeCancel>>,
}

impl RecordingSession {
    pub fn new(bounds: Bounds, settings: RecorderSettings, capture: CaptureSession) -> Self {
        Self {
            id: Uuid::new_v4(),
            bounds,
            settings,
            started_at: Local::now(),
            capture,
            temp_path: None,
            encoder: None,
        }
    }

    /// Path for the temporary raw media buffer.
    pub fn temp_file_path(&self) -> PathBuf {
        self.settings
            .output_directory
            .join(format!("temp-{}.webm", timestamp_token(&self.started_at)))
    }

    /// Path for the final compressed file.
    pub fn output_file_path(&self) -> PathBuf {
        self.settings.output_directory.join(format!(
            "recording-{}.mp4",
            timestamp_token(&self.started_at)
        ))
    }

    /// Delete the temporary raw-buffer file, best-effort.
    ///
    /// A failed delete is logged and forgotten; it never changes the
    /// session outcome.
    pub fn cleanup_temp_file(&mut self) {
        if let Some(path) = self.temp_path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to delete temp file {:?}: {}", path, e);
            } else {
                tracing::debug!("Deleted temp file {:?}", path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_token_is_sortable() {
        let earlier = Local.with_ymd_and_hms(2026, 3, 1, 9, 59, 59).unwrap();
        let later = Local.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
        assert!(timestamp_token(&earlier) < timestamp_token(&later));
    }

    #[test]
    fn test_timestamp_token_has_no_path_hostile_characters() {
        let token = timestamp_token(&Local::now());
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == '_'));
    }
}
