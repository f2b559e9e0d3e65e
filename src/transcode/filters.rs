//! Video filter composition
//!
//! Builds the `-vf` filter chain for the encoder: an optional crop to the
//! captured sub-region, followed by a scale to the target resolution.
//! The crop runs first so scaling operates on the region the user chose,
//! not on the full frame.

use crate::transcode::resolution::Resolution;
use crate::types::Bounds;

/// Compose the filter chain for one encode.
pub fn build_filter_chain(crop: Option<Bounds>, resolution: Resolution) -> String {
    match crop {
        Some(bounds) => format!(
            "crop={}:{}:{}:{},scale={}:{}",
            bounds.width, bounds.height, bounds.x, bounds.y, resolution.width, resolution.height
        ),
        None => format!("scale={}:{}", resolution.width, resolution.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_then_scale() {
        let chain = build_filter_chain(
            Some(Bounds::new(100, 50, 800, 600)),
            Resolution::new(1280, 720),
        );
        assert_eq!(chain, "crop=800:600:100:50,scale=1280:720");
    }

    #[test]
    fn test_scale_only_without_crop() {
        let chain = build_filter_chain(None, Resolution::new(1920, 1080));
        assert_eq!(chain, "scale=1920:1080");
    }

    #[test]
    fn test_crop_precedes_scale() {
        let chain = build_filter_chain(
            Some(Bounds::new(0, 0, 400, 400)),
            Resolution::new(1280, 720),
        );
        let crop_pos = chain.find("crop=").unwrap();
        let scale_pos = chain.find("scale=").unwrap();
        assert!(crop_pos < scale_pos);
    }
}
