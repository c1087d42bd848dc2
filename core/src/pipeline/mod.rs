//! Capture → OCR → cleanup → translate.
//!
//! `Pipeline` runs the stages once for one region. `PipelineWorker` owns the
//! single in-flight run and reports results over a channel.

mod worker;

pub use worker::{PipelineUpdate, PipelineWorker, UpdateReceiver};

use crate::capture::{CaptureError, CaptureRegion, ScreenCapture};
use crate::ocr::{OcrError, TextRecognizer};
use crate::text::clean_ocr_text;
use crate::translate::{TranslateError, TranslationRequest, Translator};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

pub const CAPTURE_FAILED: &str = "Screen capture failed!";
pub const OCR_FAILED: &str = "Text recognition failed!";
pub const TRANSLATOR_FAILED: &str = "Translator not installed!";
pub const TRANSLATION_FAILED: &str = "Translation failed!";

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("Capture task failed: {0}")]
    Join(String),

    #[error("Run was cancelled")]
    Cancelled,
}

/// What the output area shows for a finished run. `None` for cancelled runs.
pub fn display_text(result: Result<String, PipelineError>) -> Option<String> {
    let (headline, err) = match result {
        Ok(text) => return Some(text.trim().to_string()),
        Err(PipelineError::Cancelled) => return None,
        Err(err @ PipelineError::Capture(_)) | Err(err @ PipelineError::Join(_)) => {
            (CAPTURE_FAILED, err)
        }
        Err(err @ PipelineError::Ocr(_)) => (OCR_FAILED, err),
        Err(err @ PipelineError::Translate(TranslateError::Unavailable { .. })) => {
            (TRANSLATOR_FAILED, err)
        }
        Err(err @ PipelineError::Translate(_)) => (TRANSLATION_FAILED, err),
    };
    Some(format!("{}\n{}", headline, err))
}

pub struct Pipeline<C, R, T> {
    capture: Arc<C>,
    recognizer: R,
    translator: T,
    source_lang: String,
    target_lang: String,
}

impl<C, R, T> Pipeline<C, R, T>
where
    C: ScreenCapture,
    R: TextRecognizer,
    T: Translator,
{
    pub fn new(
        capture: C,
        recognizer: R,
        translator: T,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            capture: Arc::new(capture),
            recognizer,
            translator,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    /// Run every stage for `region`, stopping at the first cancelled check.
    pub async fn run(
        &self,
        region: CaptureRegion,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        let start = Instant::now();

        let capture = Arc::clone(&self.capture);
        let image = tokio::task::spawn_blocking(move || capture.capture(region))
            .await
            .map_err(|e| PipelineError::Join(e.to_string()))??;
        log::info!(
            "[PIPELINE] Captured {}x{} at ({}, {}) in {:.0}ms",
            region.width,
            region.height,
            region.x,
            region.y,
            start.elapsed().as_secs_f64() * 1000.0
        );
        ensure_live(cancel)?;

        let raw = self
            .recognizer
            .recognize(image, cancel)
            .await
            .map_err(|e| cancelled_or(cancel, e.into()))?;
        ensure_live(cancel)?;

        let text = clean_ocr_text(&raw);
        log::debug!("[PIPELINE] OCR text after cleanup: {:?}", text);

        let request = TranslationRequest {
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
            text,
        };
        let translated = self
            .translator
            .translate(&request, cancel)
            .await
            .map_err(|e| {
                if e.is_cancelled() {
                    PipelineError::Cancelled
                } else {
                    cancelled_or(cancel, e.into())
                }
            })?;

        log::info!(
            "[PIPELINE] Finished in {:.0}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(translated.trim().to_string())
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        Err(PipelineError::Cancelled)
    } else {
        Ok(())
    }
}

/// Stage failures caused by cancellation are reported as `Cancelled`.
fn cancelled_or(cancel: &CancellationToken, err: PipelineError) -> PipelineError {
    if cancel.is_cancelled() {
        PipelineError::Cancelled
    } else {
        err
    }
}
