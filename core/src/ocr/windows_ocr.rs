//! Windows OCR via Windows.Media.Ocr (WinRT).
//!
//! Ships with Windows 10+. The language comes from the user's installed
//! language packs, not from `OcrConfig::language`.

use super::{OcrError, TextRecognizer};
use crate::capture::encode_png;
use image::DynamicImage;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use windows::{
    Graphics::Imaging::BitmapDecoder,
    Media::Ocr::OcrEngine as WinOcrEngine,
    Storage::Streams::{DataWriter, InMemoryRandomAccessStream},
};

#[derive(Debug, Default, Clone)]
pub struct WindowsOcr;

impl WindowsOcr {
    pub fn new() -> Self {
        // Loads the OCR DLLs and language data up front.
        match WinOcrEngine::TryCreateFromUserProfileLanguages() {
            Ok(_) => log::info!("[OCR] Windows OCR engine warm-up complete"),
            Err(e) => log::warn!("[OCR] Windows OCR warm-up failed: {}", e),
        }
        Self
    }
}

impl TextRecognizer for WindowsOcr {
    async fn recognize(
        &self,
        image: DynamicImage,
        cancel: &CancellationToken,
    ) -> Result<String, OcrError> {
        let start = Instant::now();
        let png = encode_png(&image)?;

        let work = tokio::task::spawn_blocking(move || recognize_png(&png));
        let text = tokio::select! {
            joined = work => joined
                .map_err(|e| OcrError::Platform(e.to_string()))?
                .map_err(|e| OcrError::Platform(e.to_string()))?,
            _ = cancel.cancelled() => {
                return Err(OcrError::Platform("recognition cancelled".to_string()));
            }
        };

        log::info!(
            "[OCR] windows: {} chars in {:.0}ms",
            text.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(text)
    }
}

/// PNG bytes → InMemoryRandomAccessStream → BitmapDecoder
/// → SoftwareBitmap → OcrEngine::RecognizeAsync → text
fn recognize_png(png_bytes: &[u8]) -> windows::core::Result<String> {
    let stream = InMemoryRandomAccessStream::new()?;
    let writer = DataWriter::CreateDataWriter(&stream)?;
    writer.WriteBytes(png_bytes)?;
    writer.StoreAsync()?.get()?;
    writer.FlushAsync()?.get()?;
    writer.DetachStream()?;
    stream.Seek(0)?;

    let decoder = BitmapDecoder::CreateAsync(&stream)?.get()?;
    let bitmap = decoder.GetSoftwareBitmapAsync()?.get()?;

    let engine = WinOcrEngine::TryCreateFromUserProfileLanguages()?;
    let result = engine.RecognizeAsync(&bitmap)?.get()?;

    // Lines are space-joined by OcrResult::Text; rebuild them with newlines
    // so the cleanup rules see line starts.
    let mut text = String::new();
    for line in result.Lines()? {
        text.push_str(&line.Text()?.to_string());
        text.push('\n');
    }
    Ok(text)
}
