//! Error taxonomy for the recording core
//!
//! Every failure inside a session funnels through a single `error` status
//! event; these variants are what that event's reason string is built from.

use thiserror::Error;

use crate::types::{MIN_HEIGHT, MIN_WIDTH};

/// Errors that can occur during recording
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Already recording")]
    AlreadyRecording,

    #[error("No screen sources available")]
    NoSourceAvailable,

    #[error(
        "Selected region {width}x{height} is below the {MIN_WIDTH}x{MIN_HEIGHT} minimum"
    )]
    InvalidBounds { width: u32, height: u32 },

    #[error("Capture error: {0}")]
    CaptureFailure(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("Recording subsystem is disabled: {0}")]
    Disabled(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for recording operations
pub type RecordingResult<T> = Result<T, RecordingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_nonempty() {
        let errors = [
            RecordingError::AlreadyRecording,
            RecordingError::NoSourceAvailable,
            RecordingError::InvalidBounds {
                width: 50,
                height: 50,
            },
            RecordingError::CaptureFailure("stream died".into()),
            RecordingError::EncodingFailed("exit code 1".into()),
            RecordingError::Cancelled,
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
