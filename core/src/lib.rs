//! snip-translate core: everything the overlay does that is not a window.
//!
//! Domains:
//! - Selection rectangle editing (editor/)
//! - Screen region math and the capture seam (capture/)
//! - OCR engines (ocr/) and OCR text cleanup (text.rs)
//! - External translator invocation (translate.rs, process.rs)
//! - The capture → OCR → translate worker (pipeline/)
//! - Hotkey and overlay/keyboard handling (hotkey.rs, overlay.rs)
//! - Configuration (config.rs)
//!
//! The Tauri shell in `src-tauri/` owns the window and wires these together.

pub mod capture;
pub mod config;
pub mod editor;
pub mod hotkey;
pub mod ocr;
pub mod overlay;
pub mod pipeline;
pub mod process;
pub mod text;
pub mod translate;
