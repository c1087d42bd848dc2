//! Monitor capture using the `xcap` crate.

use image::DynamicImage;
use snip_translate::capture::{crop_region, CaptureError, CaptureRegion, ScreenCapture};
use std::time::Instant;
use xcap::Monitor;

/// Captures the primary monitor and crops it to the requested region.
///
/// Regions are relative to the primary monitor's origin, in physical pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapCapture;

impl ScreenCapture for XcapCapture {
    fn capture(&self, region: CaptureRegion) -> Result<DynamicImage, CaptureError> {
        let start = Instant::now();
        let screen = capture_primary_monitor()?;
        // Nothing on screen falls through to crop_region, which reports it.
        let region = region
            .clamp_to(screen.width(), screen.height())
            .unwrap_or(region);
        let cropped = crop_region(&screen, region)?;

        log::info!(
            "[CAPTURE] {}x{} from {}x{} screen in {}ms",
            cropped.width(),
            cropped.height(),
            screen.width(),
            screen.height(),
            start.elapsed().as_millis()
        );
        Ok(cropped)
    }
}

fn capture_primary_monitor() -> Result<DynamicImage, CaptureError> {
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;

    let mut fallback = None;
    let mut primary = None;
    for monitor in monitors {
        if monitor.is_primary().unwrap_or(false) {
            primary = Some(monitor);
            break;
        }
        if fallback.is_none() {
            fallback = Some(monitor);
        }
    }

    let monitor = primary.or(fallback).ok_or(CaptureError::NoMonitor)?;
    let image = monitor
        .capture_image()
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

    Ok(DynamicImage::ImageRgba8(image))
}
