//! Resolution preset mapping

use serde::Serialize;

/// Concrete output dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Default output resolution, used for unrecognized presets.
pub const DEFAULT_RESOLUTION: Resolution = Resolution::new(1920, 1080);

/// Map a named quality preset to pixel dimensions.
///
/// Unknown presets fall open to [`DEFAULT_RESOLUTION`] rather than
/// erroring, so a stale preset left in the settings file cannot block a
/// recording from finishing.
pub fn resolve_preset(preset: &str) -> Resolution {
    match preset {
        "720p" => Resolution::new(1280, 720),
        "1080p" => Resolution::new(1920, 1080),
        "1440p" => Resolution::new(2560, 1440),
        "2160p" => Resolution::new(3840, 2160),
        other => {
            tracing::warn!(
                "Unknown resolution preset '{}', falling back to {}",
                other,
                DEFAULT_RESOLUTION
            );
            DEFAULT_RESOLUTION
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_presets() {
        assert_eq!(resolve_preset("720p"), Resolution::new(1280, 720));
        assert_eq!(resolve_preset("1080p"), Resolution::new(1920, 1080));
        assert_eq!(resolve_preset("1440p"), Resolution::new(2560, 1440));
        assert_eq!(resolve_preset("2160p"), Resolution::new(3840, 2160));
    }

    #[test]
    fn test_unknown_preset_falls_back_to_1080p() {
        assert_eq!(resolve_preset("4k-ultra"), Resolution::new(1920, 1080));
        assert_eq!(resolve_preset(""), DEFAULT_RESOLUTION);
    }

    #[test]
    fn test_display() {
        assert_eq!(Resolution::new(1280, 720).to_string(), "1280x720");
    }
}
