//! Shared geometry types
//!
//! The selection UI hands the core a pixel rectangle; everything downstream
//! (capture, crop filter) works in the same coordinate space.

use serde::{Deserialize, Serialize};

use crate::recorder::error::{RecordingError, RecordingResult};

/// Minimum selectable region width in pixels.
pub const MIN_WIDTH: u32 = 100;

/// Minimum selectable region height in pixels.
pub const MIN_HEIGHT: u32 = 100;

/// Pixel rectangle describing a capture or crop region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reject regions below the selector's minimum size.
    ///
    /// The selection UI enforces this before confirming, but bounds can
    /// reach the core from other callers, so it is re-checked here.
    pub fn validate(&self) -> RecordingResult<()> {
        if self.width < MIN_WIDTH || self.height < MIN_HEIGHT {
            return Err(RecordingError::InvalidBounds {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_size_accepted() {
        assert!(Bounds::new(0, 0, MIN_WIDTH, MIN_HEIGHT).validate().is_ok());
    }

    #[test]
    fn test_too_small_rejected() {
        let err = Bounds::new(10, 10, 99, 600).validate().unwrap_err();
        assert!(matches!(err, RecordingError::InvalidBounds { .. }));

        assert!(Bounds::new(10, 10, 800, 50).validate().is_err());
    }

    #[test]
    fn test_negative_origin_is_fine() {
        // Multi-monitor layouts can place a region at negative coordinates
        assert!(Bounds::new(-1920, -200, 800, 600).validate().is_ok());
    }
}
