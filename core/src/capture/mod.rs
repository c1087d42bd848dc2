//! Screen capture: region math and the capture seam.
//!
//! The pure parts (region derivation, cropping, PNG encoding) live here.
//! Talking to the OS is the host's job: it implements `ScreenCapture`.

mod region;

pub use region::{crop_region, encode_png, CaptureRegion, CropError, ScreenMapping};

use image::DynamicImage;

/// Grabs a region of the screen as a raster image.
///
/// Called from the blocking thread pool, so implementations may block.
pub trait ScreenCapture: Send + Sync + 'static {
    fn capture(&self, region: CaptureRegion) -> Result<DynamicImage, CaptureError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No monitor found")]
    NoMonitor,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error(transparent)]
    Crop(#[from] CropError),
}
