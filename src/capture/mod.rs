//! Screen capture abstractions
//!
//! The platform capture API is modeled as a black box that streams a
//! region of a source into an encoded raw buffer.

pub mod session;
pub mod traits;

pub use session::CaptureSession;
pub use traits::{CapturePlatform, CaptureSurface, SourceInfo};
