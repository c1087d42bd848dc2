//! Capture region math, cropping and encoding.
//!
//! Geometry and pixels in, pixels out. Nothing here touches the OS.

use crate::editor::Rect;
use image::{DynamicImage, ImageFormat};
use serde::Serialize;
use std::io::Cursor;

/// A screen region in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// The pixels strictly inside a rectangle drawn with a border of
    /// `border` pixels, so the overlay's own outline is never captured.
    ///
    /// Coordinates are truncated toward zero. Returns `None` when nothing is
    /// left once the border is removed.
    pub fn inside_border(rect: &Rect, border: u32) -> Option<Self> {
        let border = border as i32;
        let width = rect.width as i32 - 2 * border;
        let height = rect.height as i32 - 2 * border;

        if width <= 0 || height <= 0 {
            return None;
        }

        Some(Self {
            x: rect.left as i32 + border,
            y: rect.top as i32 + border,
            width: width as u32,
            height: height as u32,
        })
    }

    /// Convert from logical overlay pixels to physical screen pixels.
    pub fn scaled(self, scale_factor: f64) -> Self {
        if scale_factor == 1.0 {
            return self;
        }
        Self {
            x: (self.x as f64 * scale_factor).round() as i32,
            y: (self.y as f64 * scale_factor).round() as i32,
            width: ((self.width as f64 * scale_factor).round() as u32).max(1),
            height: ((self.height as f64 * scale_factor).round() as u32).max(1),
        }
    }
}

/// Maps overlay coordinates onto the captured monitor's pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMapping {
    pub scale_factor: f64,
    /// Overlay origin relative to the monitor, in physical pixels.
    pub origin_x: i32,
    pub origin_y: i32,
}

impl Default for ScreenMapping {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            origin_x: 0,
            origin_y: 0,
        }
    }
}

impl CaptureRegion {
    pub fn to_screen(self, mapping: ScreenMapping) -> Self {
        let scaled = self.scaled(mapping.scale_factor);
        Self {
            x: scaled.x + mapping.origin_x,
            y: scaled.y + mapping.origin_y,
            ..scaled
        }
    }

    /// The part of the region that lies on a `width` x `height` screen.
    ///
    /// A selection dragged past the edge is only pulled back on the next
    /// move, so a region may hang off the screen when capture starts.
    pub fn clamp_to(self, width: u32, height: u32) -> Option<Self> {
        let left = i64::from(self.x).max(0);
        let top = i64::from(self.y).max(0);
        let right = (i64::from(self.x) + i64::from(self.width)).min(i64::from(width));
        let bottom = (i64::from(self.y) + i64::from(self.height)).min(i64::from(height));

        if right <= left || bottom <= top {
            return None;
        }

        Some(Self {
            x: left as i32,
            y: top as i32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

/// Crops a full-screen `DynamicImage` to `region`.
pub fn crop_region(image: &DynamicImage, region: CaptureRegion) -> Result<DynamicImage, CropError> {
    if region.width == 0 || region.height == 0 {
        return Err(CropError::ZeroDimension);
    }

    let (img_width, img_height) = (image.width(), image.height());

    let fits = region.x >= 0
        && region.y >= 0
        && region.x as u64 + region.width as u64 <= img_width as u64
        && region.y as u64 + region.height as u64 <= img_height as u64;

    if !fits {
        return Err(CropError::OutOfBounds {
            requested: (region.x, region.y, region.width, region.height),
            image_size: (img_width, img_height),
        });
    }

    Ok(image.crop_imm(region.x as u32, region.y as u32, region.width, region.height))
}

/// PNG-encodes an image, e.g. to feed an OCR engine over a pipe.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CropError> {
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| CropError::EncodingFailed(e.to_string()))?;

    Ok(png_bytes)
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{},{},{}) exceeds image bounds ({}x{})",
        requested.0, requested.1, requested.2, requested.3,
        image_size.0, image_size.1
    )]
    OutOfBounds {
        requested: (i32, i32, u32, u32),
        image_size: (u32, u32),
    },

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}
