//! OCR domain.
//!
//! Tesseract is driven as a subprocess on every platform. On Windows the
//! built-in Windows.Media.Ocr engine can be selected instead.

mod tesseract;
#[cfg(target_os = "windows")]
mod windows_ocr;

pub use tesseract::TesseractCli;
#[cfg(target_os = "windows")]
pub use windows_ocr::WindowsOcr;

use crate::capture::CropError;
use crate::config::{OcrBackend, OcrConfig};
use crate::process::ProcessError;
use image::DynamicImage;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Turns a raster image into plain text.
pub trait TextRecognizer: Send + Sync + 'static {
    fn recognize(
        &self,
        image: DynamicImage,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<String, OcrError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Could not encode image for OCR: {0}")]
    Encode(#[from] CropError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("OCR engine exited with status {code:?}:\n{output}")]
    Engine { code: Option<i32>, output: String },

    #[error("OCR backend {0:?} is not available on this platform")]
    Unsupported(OcrBackend),

    #[error("OCR engine failed: {0}")]
    Platform(String),
}

/// The configured OCR backend.
pub enum OcrEngine {
    Tesseract(TesseractCli),
    #[cfg(target_os = "windows")]
    Windows(WindowsOcr),
}

impl OcrEngine {
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        match config.backend {
            OcrBackend::Tesseract => {
                let engine = TesseractCli::from_config(config);
                if !engine.is_available() {
                    log::warn!(
                        "[OCR] `{}` not found on PATH, recognition will fail until it is installed",
                        config.program.display()
                    );
                }
                Ok(OcrEngine::Tesseract(engine))
            }
            #[cfg(target_os = "windows")]
            OcrBackend::Windows => Ok(OcrEngine::Windows(WindowsOcr::new())),
            #[cfg(not(target_os = "windows"))]
            OcrBackend::Windows => Err(OcrError::Unsupported(OcrBackend::Windows)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OcrEngine::Tesseract(_) => "tesseract",
            #[cfg(target_os = "windows")]
            OcrEngine::Windows(_) => "windows",
        }
    }
}

impl TextRecognizer for OcrEngine {
    async fn recognize(
        &self,
        image: DynamicImage,
        cancel: &CancellationToken,
    ) -> Result<String, OcrError> {
        match self {
            OcrEngine::Tesseract(engine) => engine.recognize(image, cancel).await,
            #[cfg(target_os = "windows")]
            OcrEngine::Windows(engine) => engine.recognize(image, cancel).await,
        }
    }
}
